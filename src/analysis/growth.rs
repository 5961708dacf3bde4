use crate::models::{GrowthCurve, ModelKind, Scenario, TimeSequence};

/// Lower bound applied to N0 and K before evaluating the logistic formula.
pub const LOGISTIC_FLOOR: f64 = 1e-12;

/// Exponential growth: N(t) = N0 * e^(r*t).
///
/// Large `r*t` overflows to `inf`; that is returned as-is.
///
/// # Examples
///
/// ```
/// use growth_scenario_explorer::{analysis::exponential, TimeSequence};
///
/// let t = TimeSequence::from_points(vec![0.0, 10.0]).unwrap();
/// let v = exponential(10.0, 0.1, &t);
/// assert_eq!(v[0], 10.0);
/// assert!((v[1] - 27.1828).abs() < 1e-3);
/// ```
pub fn exponential(n0: f64, r: f64, t: &TimeSequence) -> Vec<f64> {
    t.iter().map(|ti| n0 * (r * ti).exp()).collect()
}

/// Logistic growth: N(t) = K / (1 + ((K - N0)/N0) * e^(-r*t)).
///
/// N0 and K are floored to [`LOGISTIC_FLOOR`] so a zero initial value or capacity
/// never divides by zero.
pub fn logistic(n0: f64, r: f64, k: f64, t: &TimeSequence) -> Vec<f64> {
    let n0 = n0.max(LOGISTIC_FLOOR);
    let k = k.max(LOGISTIC_FLOOR);
    let a = (k - n0) / n0;
    t.iter().map(|ti| k / (1.0 + a * (-r * ti).exp())).collect()
}

/// Evaluate one validated scenario over `t`.
pub fn evaluate_scenario(scenario: &Scenario, t: &TimeSequence) -> GrowthCurve {
    let values = match scenario.model {
        ModelKind::Exponential => exponential(scenario.n0, scenario.r, t),
        ModelKind::Logistic => logistic(scenario.n0, scenario.r, scenario.k, t),
    };
    GrowthCurve::from_parts(t.clone(), values)
}
