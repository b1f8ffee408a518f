//! Frontend settings: defaults, overlaid by a TOML file, overlaid by CLI flags.
//!
//! Resolution order for the file:
//! 1. `--config PATH` if given (must exist).
//! 2. `<config dir>/sim8085/config.toml` if present.
//! 3. Built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Free-run clock in instructions per second. 0 runs unthrottled.
    pub clock_hz: f64,
    /// Tick budget for `--run` and for `r` without a count.
    pub max_ticks: usize,
    /// Undo snapshots kept for step-back.
    pub history_limit: usize,
    /// Show the machine-cycle panel.
    pub show_timing: bool,
    /// Bytes shown in the stack panel, ending at FFFFH.
    pub stack_window: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_hz: 5.0,
            max_ticks: 10_000,
            history_limit: 256,
            show_timing: true,
            stack_window: 16,
        }
    }
}

/// `<config dir>/sim8085/config.toml`, when the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sim8085").join("config.toml"))
}

impl Config {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reject settings the run loops cannot honour.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.clock_hz.is_finite() && self.clock_hz >= 0.0,
            "clock_hz must be a non-negative number, got {}",
            self.clock_hz
        );
        if self.clock_hz > 0.0 {
            Duration::try_from_secs_f64(1.0 / self.clock_hz)
                .with_context(|| format!("clock_hz {} is too slow", self.clock_hz))?;
        }
        Ok(())
    }

    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("checking config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
