//! Scenario model and loading

pub mod loader;
pub mod model;

pub use loader::{discover_files, load_file, load_scenarios};
pub use model::{CommandSpec, Expectations, Extraction, RequestSpec, Scenario};
