use serde::{Deserialize, Serialize};

use super::aggregate::ScenarioEvaluation;
use crate::models::{GrowthCurve, ModelKind, Scenario};

/// Headline numbers for one evaluated scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSummary {
    pub name: String,
    pub model: ModelKind,
    pub initial: f64,
    pub final_value: f64,
    pub min: f64,
    pub max: f64,
    /// Final value as a percentage of K (logistic only)
    pub percent_of_capacity: Option<f64>,
    /// ln(2)/r for growing exponential scenarios
    pub doubling_time: Option<f64>,
}

impl CurveSummary {
    pub fn new(scenario: &Scenario, curve: &GrowthCurve) -> Self {
        let final_value = curve.final_value();
        let percent_of_capacity = match scenario.model {
            ModelKind::Logistic if scenario.k > 0.0 => Some(final_value / scenario.k * 100.0),
            _ => None,
        };
        let doubling_time = match scenario.model {
            ModelKind::Exponential if scenario.r > 0.0 && scenario.n0 > 0.0 => {
                Some(std::f64::consts::LN_2 / scenario.r)
            }
            _ => None,
        };
        Self {
            name: scenario.name.clone(),
            model: scenario.model,
            initial: curve.initial(),
            final_value,
            min: curve.min(),
            max: curve.max(),
            percent_of_capacity,
            doubling_time,
        }
    }
}

/// Summaries for every evaluated scenario, in table order.
pub fn summarize(evaluation: &ScenarioEvaluation) -> Vec<CurveSummary> {
    evaluation
        .iter()
        .map(|(scenario, curve)| CurveSummary::new(scenario, curve))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::evaluate_all;
    use crate::models::{ScenarioRow, TimeSequence};

    fn evaluation() -> ScenarioEvaluation {
        let t = TimeSequence::from_points(vec![0.0, 10.0, 20.0, 50.0]).unwrap();
        evaluate_all(
            &[
                ScenarioRow::new("Base", ModelKind::Logistic, 10.0, 0.1, 100.0),
                ScenarioRow::new("Boom", ModelKind::Exponential, 10.0, 0.1, 0.0),
            ],
            &t,
        )
    }

    #[test]
    fn test_summaries_in_table_order() {
        let summaries = summarize(&evaluation());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Base");
        assert_eq!(summaries[1].name, "Boom");
    }

    #[test]
    fn test_logistic_summary() {
        let s = &summarize(&evaluation())[0];
        assert!((s.initial - 10.0).abs() < 1e-9);
        assert!((s.final_value - 94.2826).abs() < 1e-3);
        assert!((s.percent_of_capacity.unwrap() - 94.2826).abs() < 1e-3);
        assert!(s.doubling_time.is_none());
        assert!(s.max <= 100.0);
    }

    #[test]
    fn test_exponential_summary() {
        let s = &summarize(&evaluation())[1];
        assert!(s.percent_of_capacity.is_none());
        assert!((s.doubling_time.unwrap() - 6.9315).abs() < 1e-3);
        assert_eq!(s.min, 10.0);
    }

    #[test]
    fn test_no_doubling_time_for_decline() {
        let t = TimeSequence::from_points(vec![0.0, 1.0]).unwrap();
        let eval = evaluate_all(
            &[ScenarioRow::new("Decline", ModelKind::Exponential, 10.0, -0.1, 0.0)],
            &t,
        );
        assert!(summarize(&eval)[0].doubling_time.is_none());
    }
}
