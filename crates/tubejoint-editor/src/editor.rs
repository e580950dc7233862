//! Caller-owned editor state driving the joint detector.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tubejoint_detect::{DetectorConfig, JointDetector, JointPreview};
use tubejoint_ir::{CrossSection, JointConnection, Scene, Tube, TubeId};

use crate::command::EditCommand;
use crate::error::{EditorError, Result};
use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::listener::PreviewListener;
use crate::registry::{TubePatch, TubeRegistry};
use crate::snap::snap_angle;

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo states, including the current one.
    pub history_limit: usize,
    /// Settings for the joint detector run after each change.
    pub detector: DetectorConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            detector: DetectorConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(EditorError::InvalidConfig(
                "history_limit must be at least 1".into(),
            ));
        }
        self.detector.validate()?;
        Ok(())
    }
}

/// One undoable state: the tubes and the joints recorded between them.
#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    tubes: TubeRegistry,
    connections: Vec<JointConnection>,
}

/// Tube scene editor with undo/redo, selection and live joint previews.
///
/// Every change builds the next snapshot, runs the detector on it and only
/// commits if detection succeeds, so the history never holds geometry the
/// detector rejects.
pub struct Editor {
    history: History<Snapshot>,
    detector: JointDetector,
    previews: Vec<JointPreview>,
    selection: Option<TubeId>,
    wireframe: bool,
    next_id: u64,
    listeners: Vec<Box<dyn PreviewListener>>,
}

impl Editor {
    /// Create an empty editor.
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::from_scene(Scene::new(), config)
    }

    /// Open an existing scene. It becomes the oldest undo state.
    pub fn from_scene(scene: Scene, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let detector = JointDetector::new(config.detector)?;
        let tubes = TubeRegistry::from_tubes(scene.tubes)?;
        let previews = detector.detect(tubes.as_slice())?;
        let next_id = next_free_id(&tubes);
        let snapshot = Snapshot {
            tubes,
            connections: scene.connections,
        };
        Ok(Self {
            history: History::new(snapshot, config.history_limit),
            detector,
            previews,
            selection: None,
            wireframe: false,
            next_id,
            listeners: Vec::new(),
        })
    }

    /// Register a consumer of preview lists. It immediately receives the
    /// current previews.
    pub fn add_listener(&mut self, mut listener: Box<dyn PreviewListener>) {
        listener.previews_changed(&self.previews);
        self.listeners.push(listener);
    }

    fn current(&self) -> &Snapshot {
        self.history.current()
    }

    /// Tubes in insertion order.
    pub fn tubes(&self) -> &[Tube] {
        self.current().tubes.as_slice()
    }

    /// Look up a tube.
    pub fn tube(&self, id: &TubeId) -> Option<&Tube> {
        self.current().tubes.get(id)
    }

    /// Recorded joints.
    pub fn connections(&self) -> &[JointConnection] {
        &self.current().connections
    }

    /// Previews for the current tubes.
    pub fn previews(&self) -> &[JointPreview] {
        &self.previews
    }

    /// Selected tube, if any.
    pub fn selection(&self) -> Option<&TubeId> {
        self.selection.as_ref()
    }

    /// The selected tube's record.
    pub fn selected_tube(&self) -> Option<&Tube> {
        self.selection.as_ref().and_then(|id| self.tube(id))
    }

    /// Whether the renderer should draw wireframes.
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The current state as a serializable scene.
    pub fn scene(&self) -> Scene {
        let snap = self.current();
        Scene {
            tubes: snap.tubes.as_slice().to_vec(),
            connections: snap.connections.clone(),
            ..Scene::default()
        }
    }

    /// Run one command.
    pub fn apply(&mut self, command: EditCommand) -> Result<()> {
        match command {
            EditCommand::AddTube { cross_section } => self.add_tube(cross_section).map(|_| ()),
            EditCommand::UpdateTube { id, patch } => self.update_tube(&id, &patch),
            EditCommand::DeleteTube { id } => self.delete_tube(&id),
            EditCommand::SnapRotation { id, step_deg } => self.snap_rotation(&id, step_deg),
            EditCommand::AcceptJoint { tube1, tube2 } => self.accept_joint(&tube1, &tube2),
            EditCommand::Select { id } => self.select(id),
            EditCommand::ToggleWireframe => {
                self.toggle_wireframe();
                Ok(())
            }
            EditCommand::Undo => {
                self.undo();
                Ok(())
            }
            EditCommand::Redo => {
                self.redo();
                Ok(())
            }
        }
    }

    /// Add a default tube at the origin and select it.
    pub fn add_tube(&mut self, cross_section: CrossSection) -> Result<TubeId> {
        let mut next = self.current().clone();
        let id = loop {
            let candidate = TubeId::new(format!("tube-{}", self.next_id));
            self.next_id += 1;
            if !next.tubes.contains(&candidate) {
                break candidate;
            }
        };
        next.tubes.insert(Tube::new(id.clone(), cross_section))?;
        self.commit(next)?;
        info!(tube = %id, %cross_section, "tube added");
        self.selection = Some(id.clone());
        Ok(id)
    }

    /// Change fields of one tube.
    pub fn update_tube(&mut self, id: &TubeId, patch: &TubePatch) -> Result<()> {
        let mut next = self.current().clone();
        next.tubes.update(id, patch)?;
        if let Some(tube) = next.tubes.get(id) {
            if !tube.is_hollow() {
                warn!(
                    tube = %id,
                    wall = tube.wall_thickness,
                    "wall thickness leaves no hollow interior"
                );
            }
        }
        self.commit(next)
    }

    /// Delete a tube, the joints that mention it and any parent links to it.
    pub fn delete_tube(&mut self, id: &TubeId) -> Result<()> {
        let mut next = self.current().clone();
        next.tubes.remove(id)?;
        next.connections.retain(|c| !c.involves(id));
        self.commit(next)?;
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        info!(tube = %id, "tube deleted");
        Ok(())
    }

    /// Round a tube's Y rotation to the nearest multiple of `step_deg`.
    pub fn snap_rotation(&mut self, id: &TubeId, step_deg: f64) -> Result<()> {
        let mut next = self.current().clone();
        let current_y = next
            .tubes
            .get(id)
            .map(|t| t.rotation.y)
            .ok_or_else(|| EditorError::UnknownTube(id.clone()))?;
        next.tubes.set_rotation_y(id, snap_angle(current_y, step_deg)?)?;
        self.commit(next)
    }

    /// Record the current preview between `tube1` and `tube2` as a joint.
    ///
    /// `tube1` becomes the parent of `tube2`.
    pub fn accept_joint(&mut self, tube1: &TubeId, tube2: &TubeId) -> Result<()> {
        let preview = self
            .previews
            .iter()
            .find(|p| p.connects(tube1, tube2))
            .cloned()
            .ok_or_else(|| EditorError::NoPreview {
                tube1: tube1.clone(),
                tube2: tube2.clone(),
            })?;
        let angle = f64::from(preview.angle_deg);

        let mut next = self.current().clone();
        // A tube has at most one parent, so its previous joint goes.
        next.tubes.set_parent(tube2, tube1, angle)?;
        next.connections.retain(|c| c.child_id != *tube2);
        if let Some(link) = ancestor_child_of(&next.tubes, tube1, tube2) {
            next.tubes.clear_parent(&link)?;
            next.connections.retain(|c| c.child_id != link);
        }
        next.connections.push(JointConnection {
            parent_id: tube1.clone(),
            child_id: tube2.clone(),
            angle_deg: angle,
            position: preview.intersection_point,
        });
        self.commit(next)?;
        info!(parent = %tube1, child = %tube2, angle, "joint accepted");
        Ok(())
    }

    /// Select a tube or clear the selection.
    pub fn select(&mut self, id: Option<TubeId>) -> Result<()> {
        if let Some(id) = &id {
            if self.tube(id).is_none() {
                return Err(EditorError::UnknownTube(id.clone()));
            }
        }
        self.selection = id;
        Ok(())
    }

    /// Flip wireframe display.
    pub fn toggle_wireframe(&mut self) {
        self.wireframe = !self.wireframe;
    }

    /// Step back one state. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.restored();
        true
    }

    /// Step forward one state. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.restored();
        true
    }

    /// Drop history and start from an empty scene.
    pub fn reset(&mut self) {
        self.history.reset(Snapshot::default());
        self.selection = None;
        self.refresh_previews();
    }

    fn commit(&mut self, next: Snapshot) -> Result<()> {
        let previews = match self.detector.detect(next.tubes.as_slice()) {
            Ok(previews) => previews,
            Err(e) => {
                warn!(error = %e, "edit rejected");
                return Err(e.into());
            }
        };
        self.history.push(next);
        self.publish(previews);
        Ok(())
    }

    fn restored(&mut self) {
        if let Some(id) = &self.selection {
            if self.tube(id).is_none() {
                self.selection = None;
            }
        }
        self.refresh_previews();
    }

    fn refresh_previews(&mut self) {
        let previews = match self.detector.detect(self.tubes()) {
            Ok(previews) => previews,
            Err(e) => {
                // History only holds snapshots that passed detection.
                warn!(error = %e, "stored snapshot failed detection");
                Vec::new()
            }
        };
        self.publish(previews);
    }

    fn publish(&mut self, previews: Vec<JointPreview>) {
        self.previews = previews;
        for listener in &mut self.listeners {
            listener.previews_changed(&self.previews);
        }
    }
}

/// Walk up from `start` through parent links and return the tube whose
/// parent is `root`. Jointing `start` under `root` would otherwise close a
/// cycle through that link.
fn ancestor_child_of(tubes: &TubeRegistry, start: &TubeId, root: &TubeId) -> Option<TubeId> {
    let mut current = start;
    for _ in 0..tubes.len() {
        let parent = tubes.parent_of(current)?;
        if parent == root {
            return Some(current.clone());
        }
        current = parent;
    }
    None
}

/// First `tube-N` counter value not used by the given tubes.
fn next_free_id(tubes: &TubeRegistry) -> u64 {
    tubes
        .iter()
        .filter_map(|t| t.id.as_str().strip_prefix("tube-"))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n.saturating_add(1))
}
