//! Candidate pair enumeration.
//!
//! The broad phase only narrows the set of pairs handed to the exact
//! distance test. Its output is always sorted `(i, j)` with `i < j`, so the
//! detector's output order never depends on the strategy.

use std::collections::HashMap;
use std::ops::Range;

use tubejoint_math::Point3;

use crate::config::BroadPhase;

type CellKey = (i64, i64, i64);

/// Candidate pairs `(i, j)`, `i < j`, with `i` restricted to `rows`.
pub(crate) fn candidate_pairs(
    centers: &[Point3],
    rows: Range<usize>,
    strategy: BroadPhase,
    threshold: f64,
) -> Vec<(usize, usize)> {
    match strategy {
        BroadPhase::UniformGrid if threshold > 0.0 => grid_pairs(centers, rows, threshold),
        // A zero-width cell cannot bucket anything.
        _ => all_pairs(centers.len(), rows),
    }
}

fn all_pairs(n: usize, rows: Range<usize>) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in rows {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

fn cell_of(p: &Point3, cell_size: f64) -> CellKey {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}

fn grid_pairs(centers: &[Point3], rows: Range<usize>, threshold: f64) -> Vec<(usize, usize)> {
    // Slightly wider cells absorb rounding in the coordinate division, so
    // two centroids exactly one threshold apart are never two cells apart.
    let cell_size = threshold * (1.0 + 1e-9);
    let mut grid: HashMap<CellKey, Vec<usize>> = HashMap::new();
    for (idx, c) in centers.iter().enumerate() {
        grid.entry(cell_of(c, cell_size)).or_default().push(idx);
    }

    let mut pairs = Vec::new();
    for i in rows {
        let (cx, cy, cz) = cell_of(&centers[i], cell_size);
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let key = (
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    );
                    if let Some(bucket) = grid.get(&key) {
                        pairs.extend(bucket.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                    }
                }
            }
        }
    }

    // Saturated keys near the i64 limits can alias a neighbour.
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}
