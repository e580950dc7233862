#![warn(missing_docs)]

//! Pairwise tube proximity and joint preview geometry.
//!
//! Given a snapshot of tube placements, the detector reports every pair of
//! tubes whose centroids lie within the proximity threshold, along with a
//! candidate joint point, the angle between the tubes' axes and their
//! separation. Detection is a pure function of its input: the same slice
//! always yields the same previews in the same order.
//!
//! # Example
//!
//! ```
//! use tubejoint_detect::{detect_joints, DetectorConfig, JointDetector};
//! use tubejoint_ir::{CrossSection, Tube};
//!
//! let tubes = vec![
//!     Tube::new("a", CrossSection::Square),
//!     Tube::new("b", CrossSection::Rectangular).at(1.0, 0.0, 0.0),
//! ];
//! let previews = detect_joints(&tubes)?;
//! assert_eq!(previews.len(), 1);
//! assert_eq!(previews[0].distance, 1.0);
//!
//! let strict = JointDetector::new(DetectorConfig::with_threshold(0.5))?;
//! assert!(strict.detect(&tubes)?.is_empty());
//! # Ok::<(), tubejoint_detect::DetectError>(())
//! ```

mod broadphase;
pub mod config;
mod detector;
pub mod error;
mod preview;

pub use config::{BroadPhase, DetectorConfig, IntersectionMode, DEFAULT_PROXIMITY_THRESHOLD};
pub use detector::{detect_joints, validate_tubes, JointDetector};
pub use error::{DetectError, GeometryField, Result};
pub use preview::JointPreview;
