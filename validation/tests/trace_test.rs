use sim8085_core::cpu::CpuState;
use sim8085_programs::generate_conversion_program;
use sim8085_validation::{TraceError, TraceState, read_traces, record, replay, write_traces};
mod common;
use common::temp_path;

#[test]
fn test_conversion_trace() {
    let len = generate_conversion_program(10).len();
    let trace = record("conversion 10", "conversion", Some("10"), 500, &[]).expect("record");

    assert_eq!(trace.program, "conversion");
    assert_eq!(trace.input.as_deref(), Some("10"));
    assert_eq!(trace.initial, TraceState::from(&CpuState::initial()));
    assert_eq!(trace.steps.len(), len);
    assert_eq!(trace.steps.last().map(|s| s.code.as_str()), Some("HLT"));
    assert_eq!(
        trace.final_state.output,
        vec!["0", "0", "0", "0", "1", "0", "1", "0"]
    );
    assert_eq!(trace.final_state.sp, 0xFFFF);
    assert!(trace.steps.iter().all(|s| !s.cycles.is_empty()));
    for (i, step) in trace.steps.iter().enumerate() {
        assert_eq!(step.tick, i as u64);
    }
}

#[test]
fn test_replay_matches() {
    let trace = record("conversion 200", "conversion", Some("200"), 500, &[]).expect("record");
    assert_eq!(replay(&trace).ok(), Some(trace.steps.len()));

    let counter = record("counter", "counter", None, 300, &[5, 120]).expect("record");
    assert_eq!(counter.input, None);
    assert_eq!(replay(&counter).ok(), Some(300));
}

#[test]
fn test_replay_detects_tampering() {
    let mut trace = record("conversion 3", "conversion", Some("3"), 500, &[]).expect("record");
    trace.steps[10].state.a ^= 0xFF;
    match replay(&trace) {
        Err(TraceError::Mismatch { tick, .. }) => assert_eq!(tick, 10),
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_replay_needs_scenario_input() {
    assert!(matches!(
        record("conversion", "conversion", None, 500, &[]),
        Err(TraceError::Scenario(_))
    ));

    let mut trace = record("conversion 3", "conversion", Some("3"), 500, &[]).expect("record");
    trace.input = None;
    assert!(matches!(replay(&trace), Err(TraceError::Scenario(_))));
}

#[test]
fn test_file_round_trip() {
    let traces = vec![
        record("conversion 1", "conversion", Some("1"), 500, &[]).expect("record"),
        record("counter", "counter", None, 50, &[20]).expect("record"),
    ];
    for name in ["traces.json", "traces.json.gz"] {
        let path = temp_path(name);
        write_traces(&path, &traces).expect("write traces");
        let back = read_traces(&path).expect("read traces");
        assert_eq!(back, traces, "{name}");
        std::fs::remove_file(&path).ok();
    }
}

#[test]
fn test_gzip_is_compressed() {
    let traces = vec![record("counter", "counter", None, 500, &[100]).expect("record")];
    let plain = temp_path("size.json");
    let gz = temp_path("size.json.gz");
    write_traces(&plain, &traces).expect("write plain");
    write_traces(&gz, &traces).expect("write gz");
    let plain_len = std::fs::metadata(&plain).expect("plain metadata").len();
    let gz_len = std::fs::metadata(&gz).expect("gz metadata").len();
    assert!(gz_len < plain_len);
    std::fs::remove_file(&plain).ok();
    std::fs::remove_file(&gz).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let path = temp_path("does-not-exist.json.gz");
    assert!(matches!(read_traces(&path), Err(TraceError::Io(_))));
}
