use serde::{Deserialize, Serialize};

use super::TimeSequence;
use crate::error::ExplorerError;

/// Evaluated values of one scenario, one per time point.
///
/// JSON has no infinity, so non-finite values are written as the strings
/// `"inf"`, `"-inf"` or `"NaN"` and parsed back on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveParts")]
pub struct GrowthCurve {
    times: TimeSequence,
    #[serde(serialize_with = "values_serde::serialize")]
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct CurveParts {
    times: TimeSequence,
    #[serde(deserialize_with = "values_serde::deserialize")]
    values: Vec<f64>,
}

impl TryFrom<CurveParts> for GrowthCurve {
    type Error = ExplorerError;

    fn try_from(parts: CurveParts) -> Result<Self, Self::Error> {
        Self::new(parts.times, parts.values)
    }
}

mod values_serde {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Value {
        Finite(f64),
        Special(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| {
            if v.is_finite() {
                Value::Finite(*v)
            } else {
                Value::Special(v.to_string())
            }
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Value>::deserialize(deserializer)?
            .into_iter()
            .map(|v| match v {
                Value::Finite(n) => Ok(n),
                Value::Special(s) => s
                    .parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("invalid curve value '{s}'"))),
            })
            .collect()
    }
}

impl GrowthCurve {
    /// Pair a time sequence with its values. Lengths must match.
    pub fn new(times: TimeSequence, values: Vec<f64>) -> Result<Self, ExplorerError> {
        if times.len() != values.len() {
            return Err(ExplorerError::ValidationError(format!(
                "curve has {} time points but {} values",
                times.len(),
                values.len()
            )));
        }
        Ok(Self { times, values })
    }

    /// Caller guarantees one value per time point.
    pub(crate) fn from_parts(times: TimeSequence, values: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    pub fn times(&self) -> &TimeSequence {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(t, value)` pairs in time order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().zip(self.values.iter().copied())
    }

    pub fn initial(&self) -> f64 {
        self.values.first().copied().unwrap_or(f64::NAN)
    }

    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(f64::NAN)
    }

    /// Smallest value; `inf` participates like any other value.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Value at the sample closest to `t`.
    pub fn value_near(&self, t: f64) -> Option<f64> {
        let times = self.times.as_slice();
        let idx = match times.binary_search_by(|x| x.total_cmp(&t)) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) if i >= times.len() => times.len() - 1,
            Err(i) => {
                if (t - times[i - 1]) <= (times[i] - t) {
                    i - 1
                } else {
                    i
                }
            }
        };
        self.values.get(idx).copied()
    }

    /// True when every value is finite (no overflow to infinity).
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
