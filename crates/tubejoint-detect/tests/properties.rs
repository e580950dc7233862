//! Behavioural properties of joint detection over whole tube collections.

use std::f64::consts::{FRAC_PI_2, PI};

use proptest::prelude::*;
use proptest::sample::Index;
use tubejoint_detect::{
    detect_joints, BroadPhase, DetectError, DetectorConfig, GeometryField, IntersectionMode,
    JointDetector, JointPreview,
};
use tubejoint_ir::{CrossSection, Tube, TubeId, Vec3};

fn tube(id: &str, x: f64, y: f64, z: f64) -> Tube {
    Tube::new(id, CrossSection::Rectangular).at(x, y, z)
}

fn ids(p: &JointPreview) -> (&str, &str) {
    (p.tube1_id.as_str(), p.tube2_id.as_str())
}

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_coords(extent: f64) -> impl Strategy<Value = (f64, f64, f64)> {
    (-extent..extent, -extent..extent, -extent..extent)
}

/// Euler angles in radians.
fn arb_rotation() -> impl Strategy<Value = (f64, f64, f64)> {
    (-PI..PI, -PI..PI, -PI..PI)
}

fn arb_tube(id: String, extent: f64) -> impl Strategy<Value = Tube> {
    (arb_coords(extent), arb_rotation()).prop_map(move |((x, y, z), (rx, ry, rz))| {
        tube(&id, x, y, z).rotated(rx, ry, rz)
    })
}

/// Up to `max` tubes named `t0`, `t1`, ... scattered in a cube of half-width
/// `extent`. Small extents give dense pair sets.
fn arb_tubes(max: usize, extent: f64) -> impl Strategy<Value = Vec<Tube>> {
    prop::collection::vec((arb_coords(extent), arb_rotation()), 0..max).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, ((x, y, z), (rx, ry, rz)))| {
                tube(&format!("t{i}"), x, y, z).rotated(rx, ry, rz)
            })
            .collect()
    })
}

fn detector(intersection: IntersectionMode, broad_phase: BroadPhase) -> JointDetector {
    JointDetector::new(DetectorConfig {
        intersection,
        broad_phase,
        ..DetectorConfig::default()
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// Fixed scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_parallel_tubes_one_apart() {
    let out = detect_joints(&[tube("A", 0.0, 0.0, 0.0), tube("B", 1.0, 0.0, 0.0)]).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(ids(&out[0]), ("A", "B"));
    assert_eq!(out[0].distance, 1.00);
    assert_eq!(out[0].angle_deg, 0);
    assert_eq!(out[0].intersection_point, Vec3::new(0.5, 0.0, 0.0));
}

#[test]
fn scenario_coincident_quarter_turn() {
    let a = tube("A", 0.0, 0.0, 0.0);
    let b = tube("B", 0.0, 0.0, 0.0).rotated(0.0, FRAC_PI_2, 0.0);
    let out = detect_joints(&[a, b]).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].angle_deg, 90);
    assert_eq!(out[0].distance, 0.00);
    assert_eq!(out[0].intersection_point, Vec3::new(0.0, 0.0, 0.0));
}

#[test]
fn scenario_out_of_range() {
    let out = detect_joints(&[tube("A", 0.0, 0.0, 0.0), tube("B", 5.0, 0.0, 0.0)]).unwrap();
    assert!(out.is_empty());
}

#[test]
fn scenario_three_close_tubes() {
    let tubes = [
        tube("t0", 0.0, 0.0, 0.0),
        tube("t1", 0.5, 0.0, 0.0),
        tube("t2", 0.0, 0.5, 0.0),
    ];
    let out = detect_joints(&tubes).unwrap();
    let pairs: Vec<_> = out.iter().map(ids).collect();
    assert_eq!(pairs, vec![("t0", "t1"), ("t0", "t2"), ("t1", "t2")]);
}

#[test]
fn threshold_is_inclusive() {
    let at = detect_joints(&[tube("a", 0.0, 0.0, 0.0), tube("b", 2.0, 0.0, 0.0)]).unwrap();
    assert_eq!(at.len(), 1);
    assert_eq!(at[0].distance, 2.0);

    let inside = detect_joints(&[tube("a", 0.0, 0.0, 0.0), tube("b", 1.99, 0.0, 0.0)]).unwrap();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].distance, 1.99);

    let outside = detect_joints(&[tube("a", 0.0, 0.0, 0.0), tube("b", 2.01, 0.0, 0.0)]).unwrap();
    assert!(outside.is_empty());
}

#[test]
fn duplicate_positions_are_evaluated_independently() {
    let tubes = [
        tube("a", 1.0, 1.0, 1.0),
        tube("b", 1.0, 1.0, 1.0),
        tube("c", 1.0, 1.0, 1.0),
    ];
    let out = detect_joints(&tubes).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|p| p.distance == 0.0));
}

// ---------------------------------------------------------------------------
// Properties over generated placements
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn swapping_inputs_swaps_only_ids(
        a in arb_tube("A".to_string(), 1.5),
        b in arb_tube("B".to_string(), 1.5),
    ) {
        let ab = detect_joints(&[a.clone(), b.clone()]).unwrap();
        let ba = detect_joints(&[b, a]).unwrap();
        prop_assert_eq!(ab.len(), ba.len());
        if let (Some(x), Some(y)) = (ab.first(), ba.first()) {
            prop_assert_eq!(ids(x), ("A", "B"));
            prop_assert_eq!(ids(y), ("B", "A"));
            prop_assert_eq!(x.angle_deg, y.angle_deg);
            prop_assert_eq!(x.distance, y.distance);
            prop_assert_eq!(x.intersection_point, y.intersection_point);
        }
    }

    #[test]
    fn angles_stay_in_range(tubes in arb_tubes(30, 1.5)) {
        for p in detect_joints(&tubes).unwrap() {
            prop_assert!(p.angle_deg <= 180, "angle {} out of range", p.angle_deg);
        }
    }

    #[test]
    fn output_is_ordered_by_index_pairs(tubes in arb_tubes(40, 3.0)) {
        let out = detect_joints(&tubes).unwrap();
        let index = |id: &TubeId| tubes.iter().position(|t| t.id == *id).unwrap();
        let order: Vec<(usize, usize)> = out
            .iter()
            .map(|p| (index(&p.tube1_id), index(&p.tube2_id)))
            .collect();
        prop_assert!(order.iter().all(|(i, j)| i < j));
        prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn clustered_tubes_pair_count(tubes in arb_tubes(12, 0.5)) {
        // Every pair in a unit cube is within the default threshold.
        let n = tubes.len();
        let expected = if n < 2 { 0 } else { n * (n - 1) / 2 };
        prop_assert_eq!(detect_joints(&tubes).unwrap().len(), expected);
    }

    #[test]
    fn repeated_calls_are_byte_identical(tubes in arb_tubes(30, 2.0)) {
        let first = serde_json::to_string(&detect_joints(&tubes).unwrap()).unwrap();
        let second = serde_json::to_string(&detect_joints(&tubes).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn uniform_grid_matches_all_pairs(tubes in arb_tubes(80, 6.0)) {
        for mode in [IntersectionMode::Midpoint, IntersectionMode::AxisClosestPoints] {
            let expected = detector(mode, BroadPhase::AllPairs).detect(&tubes).unwrap();
            let grid = detector(mode, BroadPhase::UniformGrid).detect(&tubes).unwrap();
            prop_assert_eq!(grid, expected);
        }
    }

    #[test]
    fn row_chunks_concatenate_to_full_result(
        tubes in arb_tubes(40, 2.5),
        chunk in 1usize..9,
    ) {
        let detector = JointDetector::default();
        let full = detector.detect(&tubes).unwrap();

        let mut chunked = Vec::new();
        let mut start = 0;
        while start < tubes.len() {
            let end = (start + chunk).min(tubes.len());
            chunked.extend(detector.detect_rows(&tubes, start..end).unwrap());
            start = end;
        }
        prop_assert_eq!(chunked, full);
    }

    #[test]
    fn invalid_geometry_produces_no_partial_output(
        mut tubes in arb_tubes(20, 0.5).prop_filter("needs a tube", |t| !t.is_empty()),
        pick in any::<Index>(),
        in_rotation in any::<bool>(),
    ) {
        let k = pick.index(tubes.len());
        let field = if in_rotation {
            tubes[k].rotation.y = f64::NAN;
            GeometryField::Rotation
        } else {
            tubes[k].position.x = f64::INFINITY;
            GeometryField::Position
        };
        let err = detect_joints(&tubes).unwrap_err();
        prop_assert_eq!(
            err,
            DetectError::InvalidGeometry { tube_id: TubeId::new(format!("t{k}")), field }
        );
    }
}

#[test]
fn shared_detector_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<JointDetector>();

    let tubes: Vec<Tube> = (0..40)
        .map(|i| {
            let f = i as f64;
            tube(&format!("t{i}"), 0.3 * (f % 7.0), 0.5 * (f % 3.0), 0.2 * f)
                .rotated(0.1 * f, -0.2 * f, 0.05 * f)
        })
        .collect();
    let detector = JointDetector::default();
    let expected = detector.detect(&tubes).unwrap();
    assert!(!expected.is_empty());

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| detector.detect(&tubes).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
