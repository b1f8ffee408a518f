use sim8085_core::core::program::ProgramType;
use sim8085_programs::ScenarioError;
use sim8085_programs::registry;

#[test]
fn test_all_scenarios_registered_in_order() {
    let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["conversion", "counter"]);
}

#[test]
fn test_find_reports_input_requirement() {
    let conversion = registry::find("conversion").expect("conversion registered");
    assert!(conversion.takes_input);
    let counter = registry::find("counter").expect("counter registered");
    assert!(!counter.takes_input);
    assert!(registry::find("blink").is_none());
}

#[test]
fn test_load_builds_programs() {
    let p = registry::load("conversion", Some("10")).expect("valid input");
    assert_eq!(p.program_type(), ProgramType::Conversion);

    let p = registry::load("counter", None).expect("no input needed");
    assert_eq!(p.program_type(), ProgramType::Counter);
}

#[test]
fn test_load_rejects_bad_requests() {
    assert_eq!(
        registry::load("blink", None).err(),
        Some(ScenarioError::UnknownScenario("blink".to_string()))
    );
    assert_eq!(
        registry::load("conversion", None).err(),
        Some(ScenarioError::MissingInput)
    );
    assert_eq!(
        registry::load("conversion", Some("256")).err(),
        Some(ScenarioError::InputOutOfRange(256))
    );
    assert_eq!(
        registry::load("conversion", Some("abc")).err(),
        Some(ScenarioError::InvalidInput("abc".to_string()))
    );
}
