//! Angle snapping for rotation edits.

use tubejoint_math::round_half_up;

use crate::error::{EditorError, Result};

/// Round `radians` to the nearest multiple of `step_deg` degrees.
///
/// Ties round toward positive infinity.
pub fn snap_angle(radians: f64, step_deg: f64) -> Result<f64> {
    if !step_deg.is_finite() || step_deg <= 0.0 {
        return Err(EditorError::InvalidSnapStep(step_deg));
    }
    let steps = round_half_up(radians.to_degrees() / step_deg, 0);
    Ok((steps * step_deg).to_radians())
}
