mod growth;
mod aggregate;
mod summary;
mod explorer;

pub use growth::{evaluate_scenario, exponential, logistic, LOGISTIC_FLOOR};
pub use aggregate::{evaluate_all, evaluate_scenarios, ScenarioEvaluation};
pub use summary::{summarize, CurveSummary};
pub use explorer::Explorer;
