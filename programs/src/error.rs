use thiserror::Error;

/// Rejections raised before a scenario program is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("scenario requires an input value")]
    MissingInput,
    #[error("input is not a number: {0:?}")]
    InvalidInput(String),
    #[error("input {0} is outside 0-255")]
    InputOutOfRange(i64),
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}
