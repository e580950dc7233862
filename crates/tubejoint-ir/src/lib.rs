#![warn(missing_docs)]

//! Tube scene data model for the tubejoint editor.
//!
//! Plain serde types shared by the detector, the editor and the CLI.
//! There is no geometry here beyond the placement numbers; evaluation
//! lives in `tubejoint-detect`.
//!
//! Rotations are Euler angles in radians, applied intrinsically in
//! X, then Y, then Z order to the tube's local forward axis `(0, 0, 1)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of a tube.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TubeId(pub String);

impl TubeId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TubeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TubeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// 3D vector with f64 components (conventionally millimeters or radians).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Components as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Cross-section shape of a tube. Informational; detection ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSection {
    /// Width and height differ.
    Rectangular,
    /// Width equals height.
    Square,
}

impl fmt::Display for CrossSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossSection::Rectangular => f.write_str("rectangular"),
            CrossSection::Square => f.write_str("square"),
        }
    }
}

/// An oriented hollow prism with a rectangular cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tube {
    /// Unique identifier, immutable after creation.
    pub id: TubeId,
    /// Cross-section shape.
    pub cross_section: CrossSection,
    /// Outer width (mm).
    pub width: f64,
    /// Outer height (mm).
    pub height: f64,
    /// Wall thickness (mm).
    pub wall_thickness: f64,
    /// Length along the forward axis (mm).
    pub length: f64,
    /// Centroid in world space.
    pub position: Vec3,
    /// Euler angles in radians, X then Y then Z.
    pub rotation: Vec3,
    /// Tube this one is jointed to. A relation, not ownership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TubeId>,
    /// Angle recorded when the joint was made (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_angle_deg: Option<f64>,
}

impl Tube {
    /// Create a tube with the editor's default dimensions at the origin.
    ///
    /// Square tubes are 1 x 1, rectangular tubes 1.5 x 1; both have a
    /// 0.1 wall and length 3.
    pub fn new(id: impl Into<TubeId>, cross_section: CrossSection) -> Self {
        let width = match cross_section {
            CrossSection::Square => 1.0,
            CrossSection::Rectangular => 1.5,
        };
        Self {
            id: id.into(),
            cross_section,
            width,
            height: 1.0,
            wall_thickness: 0.1,
            length: 3.0,
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            parent_id: None,
            joint_angle_deg: None,
        }
    }

    /// Builder-style position setter.
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Builder-style rotation setter (radians).
    pub fn rotated(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// True when the walls leave an open interior: `2 * wall < min(width, height)`.
    pub fn is_hollow(&self) -> bool {
        2.0 * self.wall_thickness < self.width.min(self.height)
    }
}

/// A joint the user accepted from a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConnection {
    /// The tube the joint hangs off.
    pub parent_id: TubeId,
    /// The tube attached to the parent.
    pub child_id: TubeId,
    /// Angle between the two tubes' axes (degrees).
    pub angle_deg: f64,
    /// Joint location in world space.
    pub position: Vec3,
}

impl JointConnection {
    /// True if either end of the connection is `id`.
    pub fn involves(&self, id: &TubeId) -> bool {
        self.parent_id == *id || self.child_id == *id
    }
}

/// A tube scene as read and written by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Tubes in insertion order.
    pub tubes: Vec<Tube>,
    /// Accepted joints.
    #[serde(default)]
    pub connections: Vec<JointConnection>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            tubes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a tube by id.
    pub fn tube(&self, id: &TubeId) -> Option<&Tube> {
        self.tubes.iter().find(|t| t.id == *id)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
