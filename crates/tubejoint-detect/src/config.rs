//! Detector settings.

use serde::{Deserialize, Serialize};

use crate::error::{DetectError, Result};

/// Centroid distance at or below which two tubes are joint candidates.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 2.0;

/// How the candidate joint location is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionMode {
    /// Midpoint of the two centroids.
    #[default]
    Midpoint,
    /// Midpoint of the closest points between the two centre-axis segments.
    AxisClosestPoints,
}

/// How candidate pairs are enumerated before the exact distance test.
///
/// Both strategies yield the same previews in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhase {
    /// Every pair `(i, j)` with `i < j`.
    #[default]
    AllPairs,
    /// Bucket centroids into cubic cells one threshold wide and only pair
    /// tubes in neighbouring cells.
    UniformGrid,
}

/// Joint detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum centroid distance for a pair to be reported (inclusive).
    pub proximity_threshold: f64,
    /// Joint location strategy.
    pub intersection: IntersectionMode,
    /// Pair enumeration strategy.
    pub broad_phase: BroadPhase,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            intersection: IntersectionMode::default(),
            broad_phase: BroadPhase::default(),
        }
    }
}

impl DetectorConfig {
    /// Default settings with a different threshold.
    pub fn with_threshold(proximity_threshold: f64) -> Self {
        Self {
            proximity_threshold,
            ..Self::default()
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.proximity_threshold.is_finite() {
            return Err(DetectError::InvalidConfig(
                "proximity_threshold must be finite".into(),
            ));
        }
        if self.proximity_threshold < 0.0 {
            return Err(DetectError::InvalidConfig(
                "proximity_threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}
