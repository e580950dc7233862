//! Error types for editor operations.

use thiserror::Error;
use tubejoint_detect::DetectError;
use tubejoint_ir::TubeId;

/// Errors that can occur while editing a tube scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// A tube with this id already exists.
    #[error("duplicate tube id: {0}")]
    DuplicateId(TubeId),

    /// No tube with this id exists.
    #[error("tube not found: {0}")]
    UnknownTube(TubeId),

    /// A dimension must be positive and finite.
    #[error("invalid {field}: {value} (must be positive and finite)")]
    InvalidDimension {
        /// Dimension name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// There is no current preview for this pair.
    #[error("no joint preview between {tube1} and {tube2}")]
    NoPreview {
        /// First tube.
        tube1: TubeId,
        /// Second tube.
        tube2: TubeId,
    },

    /// Snap increment must be positive and finite.
    #[error("invalid snap step: {0} degrees")]
    InvalidSnapStep(f64),

    /// Editor settings are unusable.
    #[error("invalid editor config: {0}")]
    InvalidConfig(String),

    /// The edit would leave the scene with geometry the detector rejects.
    #[error(transparent)]
    Detect(#[from] DetectError),
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
