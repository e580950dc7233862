//! The ordered tube collection owned by the editor.

use serde::{Deserialize, Serialize};
use tubejoint_ir::{CrossSection, Tube, TubeId, Vec3};

use crate::error::{EditorError, Result};

/// A partial update to a tube. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubePatch {
    /// New cross-section label.
    pub cross_section: Option<CrossSection>,
    /// New outer width.
    pub width: Option<f64>,
    /// New outer height.
    pub height: Option<f64>,
    /// New wall thickness.
    pub wall_thickness: Option<f64>,
    /// New length.
    pub length: Option<f64>,
    /// New centroid.
    pub position: Option<Vec3>,
    /// New Euler rotation (radians).
    pub rotation: Option<Vec3>,
}

impl TubePatch {
    /// Patch that only moves the tube.
    pub fn position(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Some(Vec3::new(x, y, z)),
            ..Self::default()
        }
    }

    /// Patch that only rotates the tube.
    pub fn rotation(x: f64, y: f64, z: f64) -> Self {
        Self {
            rotation: Some(Vec3::new(x, y, z)),
            ..Self::default()
        }
    }

    fn check_dimensions(&self) -> Result<()> {
        let dims = [
            ("width", self.width),
            ("height", self.height),
            ("wall_thickness", self.wall_thickness),
            ("length", self.length),
        ];
        for (field, value) in dims {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(EditorError::InvalidDimension { field, value });
                }
            }
        }
        Ok(())
    }

    fn apply_to(&self, tube: &mut Tube) {
        if let Some(cs) = self.cross_section {
            tube.cross_section = cs;
        }
        if let Some(v) = self.width {
            tube.width = v;
        }
        if let Some(v) = self.height {
            tube.height = v;
        }
        if let Some(v) = self.wall_thickness {
            tube.wall_thickness = v;
        }
        if let Some(v) = self.length {
            tube.length = v;
        }
        if let Some(v) = self.position {
            tube.position = v;
        }
        if let Some(v) = self.rotation {
            tube.rotation = v;
        }
    }
}

/// Tubes in insertion order with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeRegistry {
    tubes: Vec<Tube>,
}

impl TubeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting repeated ids.
    pub fn from_tubes(tubes: Vec<Tube>) -> Result<Self> {
        let mut registry = Self::new();
        for tube in tubes {
            registry.insert(tube)?;
        }
        Ok(registry)
    }

    /// Number of tubes.
    pub fn len(&self) -> usize {
        self.tubes.len()
    }

    /// Check if there are no tubes.
    pub fn is_empty(&self) -> bool {
        self.tubes.is_empty()
    }

    /// The tubes as a slice, the snapshot handed to the detector.
    pub fn as_slice(&self) -> &[Tube] {
        &self.tubes
    }

    /// Iterate tubes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tube> {
        self.tubes.iter()
    }

    /// Get a tube by id.
    pub fn get(&self, id: &TubeId) -> Option<&Tube> {
        self.tubes.iter().find(|t| t.id == *id)
    }

    fn get_mut(&mut self, id: &TubeId) -> Result<&mut Tube> {
        self.tubes
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| EditorError::UnknownTube(id.clone()))
    }

    /// Check if a tube with `id` exists.
    pub fn contains(&self, id: &TubeId) -> bool {
        self.get(id).is_some()
    }

    /// Append a tube.
    pub fn insert(&mut self, tube: Tube) -> Result<()> {
        if self.contains(&tube.id) {
            return Err(EditorError::DuplicateId(tube.id));
        }
        self.tubes.push(tube);
        Ok(())
    }

    /// Apply a patch to one tube. Nothing changes if the patch is rejected.
    pub fn update(&mut self, id: &TubeId, patch: &TubePatch) -> Result<()> {
        patch.check_dimensions()?;
        let tube = self.get_mut(id)?;
        patch.apply_to(tube);
        Ok(())
    }

    /// Set the Euler Y angle of one tube (radians).
    pub fn set_rotation_y(&mut self, id: &TubeId, radians: f64) -> Result<()> {
        self.get_mut(id)?.rotation.y = radians;
        Ok(())
    }

    /// Record that `child` is jointed to `parent` at `angle_deg`.
    pub fn set_parent(&mut self, child: &TubeId, parent: &TubeId, angle_deg: f64) -> Result<()> {
        if !self.contains(parent) {
            return Err(EditorError::UnknownTube(parent.clone()));
        }
        let tube = self.get_mut(child)?;
        tube.parent_id = Some(parent.clone());
        tube.joint_angle_deg = Some(angle_deg);
        Ok(())
    }

    /// Drop the joint link of one tube.
    pub fn clear_parent(&mut self, id: &TubeId) -> Result<()> {
        let tube = self.get_mut(id)?;
        tube.parent_id = None;
        tube.joint_angle_deg = None;
        Ok(())
    }

    /// The tube `id` is jointed to, if any.
    pub fn parent_of(&self, id: &TubeId) -> Option<&TubeId> {
        self.get(id).and_then(|t| t.parent_id.as_ref())
    }

    /// Remove a tube and clear any parent references to it.
    pub fn remove(&mut self, id: &TubeId) -> Result<Tube> {
        let idx = self
            .tubes
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| EditorError::UnknownTube(id.clone()))?;
        let removed = self.tubes.remove(idx);
        for tube in &mut self.tubes {
            if tube.parent_id.as_ref() == Some(id) {
                tube.parent_id = None;
                tube.joint_angle_deg = None;
            }
        }
        Ok(removed)
    }

    /// Consume the registry, returning the tubes in order.
    pub fn into_vec(self) -> Vec<Tube> {
        self.tubes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(ids: &[&str]) -> TubeRegistry {
        TubeRegistry::from_tubes(
            ids.iter()
                .map(|id| Tube::new(*id, CrossSection::Square))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut r = reg(&["a"]);
        let err = r.insert(Tube::new("a", CrossSection::Rectangular)).unwrap_err();
        assert_eq!(err, EditorError::DuplicateId(TubeId::new("a")));
        assert_eq!(r.len(), 1);
        assert!(TubeRegistry::from_tubes(vec![
            Tube::new("x", CrossSection::Square),
            Tube::new("x", CrossSection::Square),
        ])
        .is_err());
    }

    #[test]
    fn update_applies_patch() {
        let mut r = reg(&["a", "b"]);
        let patch = TubePatch {
            width: Some(2.0),
            position: Some(Vec3::new(1.0, 2.0, 3.0)),
            ..TubePatch::default()
        };
        r.update(&TubeId::new("b"), &patch).unwrap();
        let b = r.get(&TubeId::new("b")).unwrap();
        assert_eq!(b.width, 2.0);
        assert_eq!(b.height, 1.0);
        assert_eq!(b.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(r.get(&TubeId::new("a")).unwrap().width, 1.0);
    }

    #[test]
    fn update_rejects_bad_dimensions() {
        let mut r = reg(&["a"]);
        for patch in [
            TubePatch { width: Some(0.0), ..TubePatch::default() },
            TubePatch { length: Some(-3.0), ..TubePatch::default() },
            TubePatch { wall_thickness: Some(f64::NAN), ..TubePatch::default() },
        ] {
            assert!(matches!(
                r.update(&TubeId::new("a"), &patch),
                Err(EditorError::InvalidDimension { .. })
            ));
        }
        assert_eq!(r.get(&TubeId::new("a")).unwrap().width, 1.0);
    }

    #[test]
    fn update_unknown_tube() {
        let mut r = reg(&["a"]);
        let err = r.update(&TubeId::new("zz"), &TubePatch::position(0.0, 0.0, 0.0));
        assert_eq!(err, Err(EditorError::UnknownTube(TubeId::new("zz"))));
    }

    #[test]
    fn remove_clears_parent_links() {
        let mut r = reg(&["a", "b", "c"]);
        r.set_parent(&TubeId::new("b"), &TubeId::new("a"), 90.0).unwrap();
        r.set_parent(&TubeId::new("c"), &TubeId::new("b"), 45.0).unwrap();
        let removed = r.remove(&TubeId::new("a")).unwrap();
        assert_eq!(removed.id, TubeId::new("a"));
        let b = r.get(&TubeId::new("b")).unwrap();
        assert!(b.parent_id.is_none());
        assert!(b.joint_angle_deg.is_none());
        let c = r.get(&TubeId::new("c")).unwrap();
        assert_eq!(c.parent_id, Some(TubeId::new("b")));
        let ids: Vec<_> = r.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn clear_parent_drops_link_and_angle() {
        let mut r = reg(&["a", "b"]);
        r.set_parent(&TubeId::new("b"), &TubeId::new("a"), 45.0).unwrap();
        assert_eq!(r.parent_of(&TubeId::new("b")), Some(&TubeId::new("a")));
        r.clear_parent(&TubeId::new("b")).unwrap();
        assert!(r.parent_of(&TubeId::new("b")).is_none());
        assert!(r.get(&TubeId::new("b")).unwrap().joint_angle_deg.is_none());
        assert!(r.clear_parent(&TubeId::new("zz")).is_err());
    }

    #[test]
    fn set_parent_requires_both_tubes() {
        let mut r = reg(&["a"]);
        assert!(r.set_parent(&TubeId::new("a"), &TubeId::new("nope"), 0.0).is_err());
        assert!(r.set_parent(&TubeId::new("nope"), &TubeId::new("a"), 0.0).is_err());
    }
}
