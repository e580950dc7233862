//! Serializable edit commands.
//!
//! Every user action is a value, so a session can be scripted, logged and
//! replayed against an [`Editor`](crate::Editor).

use serde::{Deserialize, Serialize};
use tubejoint_ir::{CrossSection, TubeId};

use crate::registry::TubePatch;

/// One editor action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    /// Add a default tube at the origin and select it.
    AddTube {
        /// Shape of the new tube.
        cross_section: CrossSection,
    },
    /// Change some fields of a tube.
    UpdateTube {
        /// Target tube.
        id: TubeId,
        /// Fields to change.
        #[serde(default)]
        patch: TubePatch,
    },
    /// Delete a tube.
    DeleteTube {
        /// Target tube.
        id: TubeId,
    },
    /// Round a tube's Y rotation to a multiple of `step_deg`.
    SnapRotation {
        /// Target tube.
        id: TubeId,
        /// Increment in degrees (45 and 90 in the UI).
        step_deg: f64,
    },
    /// Turn a current preview into a recorded joint.
    AcceptJoint {
        /// Parent side of the joint.
        tube1: TubeId,
        /// Child side of the joint.
        tube2: TubeId,
    },
    /// Select a tube, or clear the selection with `null`.
    Select {
        /// Tube to select.
        id: Option<TubeId>,
    },
    /// Flip between wireframe and solid display.
    ToggleWireframe,
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,
}

impl EditCommand {
    /// Parse a JSON array of commands.
    pub fn parse_script(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
