mod time;
mod scenario;
mod table;
mod curve;

pub use time::{TimeConfig, TimeSequence, MAX_RESOLUTION, MIN_HORIZON, MIN_RESOLUTION};
pub use scenario::{CellValue, ModelKind, Scenario, ScenarioRow, ValidationIssue};
pub use table::{ScenarioDefaults, ScenarioPatch, ScenarioTable};
pub use curve::GrowthCurve;
