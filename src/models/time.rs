use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// Smallest horizon the front ends accept.
pub const MIN_HORIZON: f64 = 1.0;
/// Resolution bounds exposed to users.
pub const MIN_RESOLUTION: usize = 50;
pub const MAX_RESOLUTION: usize = 2000;

/// User-facing time settings: how far to project and how many points to sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Time horizon in model units
    pub horizon: f64,
    /// Number of evaluation points, including both endpoints
    pub resolution: usize,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            horizon: 50.0,
            resolution: 500,
        }
    }
}

impl TimeConfig {
    pub fn new(horizon: f64, resolution: usize) -> Self {
        Self {
            horizon,
            resolution,
        }
    }

    /// Check the configuration against the bounds offered to users.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        if !self.horizon.is_finite() || self.horizon < MIN_HORIZON {
            return Err(ExplorerError::ValidationError(format!(
                "horizon must be at least {MIN_HORIZON}, got {}",
                self.horizon
            )));
        }
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(ExplorerError::ValidationError(format!(
                "resolution must be in {MIN_RESOLUTION}..={MAX_RESOLUTION}, got {}",
                self.resolution
            )));
        }
        Ok(())
    }

    /// Generate the time sequence described by this configuration.
    pub fn sequence(&self) -> Result<TimeSequence, ExplorerError> {
        TimeSequence::generate(self.horizon, self.resolution)
    }
}

/// Ordered, strictly increasing, non-negative evaluation times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TimeSequence {
    points: Vec<f64>,
}

impl TimeSequence {
    /// Evenly spaced points from 0 to `horizon` inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use growth_scenario_explorer::TimeSequence;
    ///
    /// let t = TimeSequence::generate(10.0, 5).unwrap();
    /// assert_eq!(t.as_slice(), &[0.0, 2.5, 5.0, 7.5, 10.0]);
    /// ```
    pub fn generate(horizon: f64, resolution: usize) -> Result<Self, ExplorerError> {
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(ExplorerError::ValidationError(format!(
                "horizon must be a positive finite number, got {horizon}"
            )));
        }
        if resolution < 2 {
            return Err(ExplorerError::ValidationError(format!(
                "resolution must be at least 2, got {resolution}"
            )));
        }

        let last = resolution - 1;
        let step = horizon / last as f64;
        let points = (0..resolution)
            .map(|i| if i == last { horizon } else { i as f64 * step })
            .collect();

        Ok(Self { points })
    }

    /// Build a sequence from explicit points.
    pub fn from_points(points: Vec<f64>) -> Result<Self, ExplorerError> {
        if points.is_empty() {
            return Err(ExplorerError::ValidationError(
                "time sequence needs at least one point".to_string(),
            ));
        }
        if let Some(bad) = points.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(ExplorerError::ValidationError(format!(
                "time points must be finite and non-negative, got {bad}"
            )));
        }
        if points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ExplorerError::ValidationError(
                "time points must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed sequence; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.points.get(index).copied()
    }

    /// Last sampled time.
    pub fn horizon(&self) -> f64 {
        self.points.last().copied().unwrap_or(0.0)
    }
}

impl TryFrom<Vec<f64>> for TimeSequence {
    type Error = ExplorerError;

    fn try_from(points: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<TimeSequence> for Vec<f64> {
    fn from(seq: TimeSequence) -> Self {
        seq.points
    }
}
