pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

#[cfg(feature = "web")]
pub mod web;

pub use analysis::Explorer;
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use io::{ScenarioReader, ScenarioWriter};
pub use models::{
    GrowthCurve, ModelKind, Scenario, ScenarioRow, ScenarioTable, TimeConfig, TimeSequence,
};
