//! Joint preview records.

use serde::{Deserialize, Serialize};
use tubejoint_ir::{TubeId, Vec3};

/// A candidate joint between two tubes.
///
/// Recomputed from scratch on every detection pass; it carries no identity
/// across passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointPreview {
    /// The tube with the lower input index.
    pub tube1_id: TubeId,
    /// The tube with the higher input index.
    pub tube2_id: TubeId,
    /// Candidate joint location, same frame as `Tube::position`.
    pub intersection_point: Vec3,
    /// Angle between the orientation axes, whole degrees in `[0, 180]`.
    pub angle_deg: u32,
    /// Centroid separation rounded to two decimals.
    pub distance: f64,
}

impl JointPreview {
    /// True if this preview is for the unordered pair `{a, b}`.
    pub fn connects(&self, a: &TubeId, b: &TubeId) -> bool {
        (self.tube1_id == *a && self.tube2_id == *b) || (self.tube1_id == *b && self.tube2_id == *a)
    }
}
