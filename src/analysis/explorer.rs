use tracing::debug;

use super::aggregate::{evaluate_all, ScenarioEvaluation};
use super::summary::{summarize, CurveSummary};
use crate::error::ExplorerError;
use crate::models::{ScenarioRow, ScenarioTable, TimeConfig, TimeSequence};

/// Unified evaluation API: owns the time settings and the sequence generated
/// from them, so repeated evaluations reuse one sampling.
#[derive(Debug, Clone)]
pub struct Explorer {
    config: TimeConfig,
    sequence: TimeSequence,
}

impl Explorer {
    /// Create an Explorer for the given time settings.
    pub fn new(config: TimeConfig) -> Result<Self, ExplorerError> {
        config.validate()?;
        let sequence = config.sequence()?;
        Ok(Self { config, sequence })
    }

    pub fn time_config(&self) -> TimeConfig {
        self.config
    }

    pub fn time_sequence(&self) -> &TimeSequence {
        &self.sequence
    }

    /// Change the time settings. Returns `true` if the sequence was regenerated.
    pub fn set_time_config(&mut self, config: TimeConfig) -> Result<bool, ExplorerError> {
        if config == self.config {
            return Ok(false);
        }
        config.validate()?;
        self.sequence = config.sequence()?;
        self.config = config;
        debug!(
            horizon = config.horizon,
            resolution = config.resolution,
            "regenerated time sequence"
        );
        Ok(true)
    }

    /// Evaluate every row of the table.
    pub fn evaluate(&self, table: &ScenarioTable) -> ScenarioEvaluation {
        self.evaluate_rows(table.rows())
    }

    pub fn evaluate_rows(&self, rows: &[ScenarioRow]) -> ScenarioEvaluation {
        evaluate_all(rows, &self.sequence)
    }

    /// Evaluate the table and summarize each curve.
    pub fn summaries(&self, table: &ScenarioTable) -> Vec<CurveSummary> {
        summarize(&self.evaluate(table))
    }
}
