use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::growth::evaluate_scenario;
use crate::models::{GrowthCurve, Scenario, ScenarioRow, TimeSequence, ValidationIssue};

/// Outcome of evaluating a scenario table against one time sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEvaluation {
    /// Valid scenarios, in table order
    pub scenarios: Vec<Scenario>,
    /// Curve per scenario name
    pub curves: BTreeMap<String, GrowthCurve>,
    /// Problems with rows that were skipped
    pub issues: Vec<ValidationIssue>,
}

impl ScenarioEvaluation {
    pub fn curve(&self, name: &str) -> Option<&GrowthCurve> {
        self.curves.get(name)
    }

    pub fn num_valid(&self) -> usize {
        self.curves.len()
    }

    /// Number of distinct rows that were skipped.
    pub fn num_skipped(&self) -> usize {
        self.issues
            .iter()
            .map(|i| i.row_index)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Scenarios paired with their curves, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&Scenario, &GrowthCurve)> {
        self.scenarios
            .iter()
            .filter_map(|s| self.curves.get(&s.name).map(|c| (s, c)))
    }
}

/// Evaluate already-validated scenarios, keyed by name.
pub fn evaluate_scenarios(
    scenarios: &[Scenario],
    t: &TimeSequence,
) -> BTreeMap<String, GrowthCurve> {
    scenarios
        .iter()
        .map(|s| (s.name.clone(), evaluate_scenario(s, t)))
        .collect()
}

/// Evaluate every row of a scenario table.
///
/// A row that cannot be turned into a scenario is skipped and its issues are
/// recorded; the rest of the table still evaluates. When two rows share a
/// name, the first one wins.
pub fn evaluate_all(rows: &[ScenarioRow], t: &TimeSequence) -> ScenarioEvaluation {
    let mut scenarios = Vec::with_capacity(rows.len());
    let mut curves = BTreeMap::new();
    let mut issues = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let scenario = match row.to_scenario(row_index) {
            Ok(s) => s,
            Err(row_issues) => {
                for issue in &row_issues {
                    warn!(%issue, "skipping invalid scenario row");
                }
                issues.extend(row_issues);
                continue;
            }
        };

        if curves.contains_key(&scenario.name) {
            warn!(scenario = %scenario.name, row_index, "skipping duplicate scenario name");
            issues.push(ValidationIssue {
                row_index,
                name: Some(scenario.name.clone()),
                field: "name".to_string(),
                message: format!("duplicate scenario name '{}'", scenario.name),
            });
            continue;
        }

        curves.insert(scenario.name.clone(), evaluate_scenario(&scenario, t));
        scenarios.push(scenario);
    }

    debug!(
        evaluated = curves.len(),
        skipped = rows.len() - curves.len(),
        points = t.len(),
        "evaluated scenario table"
    );

    ScenarioEvaluation {
        scenarios,
        curves,
        issues,
    }
}
