pub mod conversion;
pub mod counter;
pub mod error;
pub mod registry;

pub use conversion::generate_conversion_program;
pub use counter::generate_counter_program;
pub use error::ScenarioError;

/// Port wired to the LED bank.
pub const LED_PORT: u8 = 0x01;
