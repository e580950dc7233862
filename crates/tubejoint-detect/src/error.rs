//! Error types for joint detection.

use std::fmt;

use thiserror::Error;
use tubejoint_ir::TubeId;

/// Which part of a tube's placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryField {
    /// The centroid.
    Position,
    /// The Euler angles.
    Rotation,
}

impl fmt::Display for GeometryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryField::Position => f.write_str("position"),
            GeometryField::Rotation => f.write_str("rotation"),
        }
    }
}

/// Errors that can occur during joint detection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// A tube's position or rotation holds NaN or infinity.
    #[error("invalid geometry on tube {tube_id}: non-finite {field}")]
    InvalidGeometry {
        /// The offending tube.
        tube_id: TubeId,
        /// Which placement field is bad.
        field: GeometryField,
    },

    /// Detector settings are unusable.
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
}

/// Result type for detection operations.
pub type Result<T> = std::result::Result<T, DetectError>;
