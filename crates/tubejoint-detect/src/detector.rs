//! Pairwise proximity and joint geometry.

use std::ops::Range;

use tracing::{debug, trace};
use tubejoint_ir::{Tube, Vec3 as IrVec3};
use tubejoint_math::{
    angle_between_deg, closest_points_on_segments, is_finite3, orientation_axis, round_half_up,
    Point3, Transform, Vec3,
};

use crate::broadphase::candidate_pairs;
use crate::config::{DetectorConfig, IntersectionMode};
use crate::error::{DetectError, GeometryField, Result};
use crate::preview::JointPreview;

/// World-space quantities derived once per tube per pass.
struct Placement {
    center: Point3,
    axis: Vec3,
    /// Centre-axis segment endpoints, only needed for axis intersection.
    segment: Option<(Point3, Point3)>,
}

impl Placement {
    fn of(tube: &Tube, with_segment: bool) -> Self {
        let center = to_point(&tube.position);
        let rotation = to_vec(&tube.rotation);
        let axis = orientation_axis(&rotation);
        let segment = with_segment.then(|| {
            let half = tube.length / 2.0;
            let t = Transform::placement(&center, &rotation);
            (
                t.apply_point(&Point3::new(0.0, 0.0, -half)),
                t.apply_point(&Point3::new(0.0, 0.0, half)),
            )
        });
        Self {
            center,
            axis,
            segment,
        }
    }
}

fn to_point(v: &IrVec3) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}

fn to_vec(v: &IrVec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn from_point(p: &Point3) -> IrVec3 {
    IrVec3::new(p.x, p.y, p.z)
}

/// Check every tube for non-finite placement, in input order.
///
/// Returns the first failure; no tube after it is inspected.
pub fn validate_tubes(tubes: &[Tube]) -> Result<()> {
    for tube in tubes {
        if !is_finite3(&to_vec(&tube.position)) {
            return Err(DetectError::InvalidGeometry {
                tube_id: tube.id.clone(),
                field: GeometryField::Position,
            });
        }
        if !is_finite3(&to_vec(&tube.rotation)) {
            return Err(DetectError::InvalidGeometry {
                tube_id: tube.id.clone(),
                field: GeometryField::Rotation,
            });
        }
    }
    Ok(())
}

/// Reports joint candidates for a tube collection.
///
/// Holds only immutable settings, so one detector can be shared across
/// threads and called on any number of snapshots.
#[derive(Debug, Clone, Default)]
pub struct JointDetector {
    config: DetectorConfig,
}

impl JointDetector {
    /// Create a detector, validating the settings.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The detector's settings.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Previews for every pair within the proximity threshold.
    ///
    /// Output is ordered by `(i, j)` over input indices with `i < j`, and
    /// each record names the lower-index tube first.
    pub fn detect(&self, tubes: &[Tube]) -> Result<Vec<JointPreview>> {
        self.detect_rows(tubes, 0..tubes.len())
    }

    /// Previews for the pairs `(i, j)` with `i` in `rows`.
    ///
    /// Concatenating the results for consecutive ranges that cover
    /// `0..tubes.len()` gives exactly [`JointDetector::detect`]. The whole
    /// input is still validated on every call.
    pub fn detect_rows(&self, tubes: &[Tube], rows: Range<usize>) -> Result<Vec<JointPreview>> {
        validate_tubes(tubes)?;

        let n = tubes.len();
        let rows = rows.start.min(n)..rows.end.min(n);
        let with_segment = self.config.intersection == IntersectionMode::AxisClosestPoints;
        let placements: Vec<Placement> = tubes
            .iter()
            .map(|t| Placement::of(t, with_segment))
            .collect();
        let centers: Vec<Point3> = placements.iter().map(|p| p.center).collect();

        let threshold = self.config.proximity_threshold;
        let pairs = candidate_pairs(&centers, rows, self.config.broad_phase, threshold);

        let mut previews = Vec::new();
        for &(i, j) in &pairs {
            let preview =
                self.evaluate_pair(&tubes[i], &placements[i], &tubes[j], &placements[j]);
            if let Some(preview) = preview {
                previews.push(preview);
            }
        }

        debug!(
            tubes = n,
            candidates = pairs.len(),
            previews = previews.len(),
            "joint detection pass"
        );
        Ok(previews)
    }

    fn evaluate_pair(
        &self,
        a: &Tube,
        pa: &Placement,
        b: &Tube,
        pb: &Placement,
    ) -> Option<JointPreview> {
        let distance = (pb.center - pa.center).norm();
        if distance > self.config.proximity_threshold {
            return None;
        }

        let point = match (self.config.intersection, pa.segment, pb.segment) {
            (IntersectionMode::AxisClosestPoints, Some((s1, e1)), Some((s2, e2))) => {
                let (c1, c2) = closest_points_on_segments(&s1, &e1, &s2, &e2);
                midpoint(&c1, &c2)
            }
            _ => midpoint(&pa.center, &pb.center),
        };

        let angle = round_half_up(angle_between_deg(&pa.axis, &pb.axis), 0).clamp(0.0, 180.0);

        trace!(tube1 = %a.id, tube2 = %b.id, distance, angle, "pair within threshold");

        Some(JointPreview {
            tube1_id: a.id.clone(),
            tube2_id: b.id.clone(),
            intersection_point: from_point(&point),
            angle_deg: angle as u32,
            distance: round_half_up(distance, 2),
        })
    }
}

fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Detect joints with the default settings (threshold 2.0, midpoint).
pub fn detect_joints(tubes: &[Tube]) -> Result<Vec<JointPreview>> {
    JointDetector::default().detect(tubes)
}
