//! Scenario registry for automatic front-end discovery.
//!
//! Each scenario self-registers via [`inventory::submit!`] with a
//! [`ScenarioEntry`] containing its CLI name and a factory function. The
//! front-end discovers available scenarios at runtime without any central
//! list.

use sim8085_core::core::program::SimulationProgram;

use crate::error::ScenarioError;

/// Describes a loadable scenario.
pub struct ScenarioEntry {
    /// CLI name used to select this scenario (e.g., "counter").
    pub name: &'static str,
    /// One-line summary for `--list`.
    pub description: &'static str,
    /// Whether `create` needs an input value.
    pub takes_input: bool,
    /// Factory: validate the optional input and build the program.
    pub create: fn(Option<&str>) -> Result<SimulationProgram, ScenarioError>,
}

impl ScenarioEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        takes_input: bool,
        create: fn(Option<&str>) -> Result<SimulationProgram, ScenarioError>,
    ) -> Self {
        Self {
            name,
            description,
            takes_input,
            create,
        }
    }
}

inventory::collect!(ScenarioEntry);

/// Return all registered scenarios, sorted by name.
pub fn all() -> Vec<&'static ScenarioEntry> {
    let mut entries: Vec<_> = inventory::iter::<ScenarioEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a scenario by its CLI name.
pub fn find(name: &str) -> Option<&'static ScenarioEntry> {
    inventory::iter::<ScenarioEntry>
        .into_iter()
        .find(|e| e.name == name)
}

/// Look up `name` and build its program in one go.
pub fn load(name: &str, input: Option<&str>) -> Result<SimulationProgram, ScenarioError> {
    let entry = find(name).ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))?;
    log::debug!("building scenario {name} (input {input:?})");
    (entry.create)(input)
}
