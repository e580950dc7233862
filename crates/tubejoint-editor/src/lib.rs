#![warn(missing_docs)]

//! Editor state for tube scenes.
//!
//! The [`Editor`] owns an ordered tube registry, a bounded snapshot history,
//! the current selection and display flags. After every change it re-runs
//! the joint detector and hands the fresh previews to registered
//! [`PreviewListener`]s. Edits that would leave geometry the detector
//! rejects are refused and nothing is committed.
//!
//! ```
//! use tubejoint_editor::{Editor, EditorConfig};
//! use tubejoint_ir::CrossSection;
//!
//! let mut editor = Editor::new(EditorConfig::default()).unwrap();
//! editor.add_tube(CrossSection::Square).unwrap();
//! editor.add_tube(CrossSection::Rectangular).unwrap();
//! assert_eq!(editor.previews().len(), 1);
//! editor.undo();
//! assert!(editor.previews().is_empty());
//! ```

mod command;
mod editor;
pub mod error;
mod history;
mod listener;
mod registry;
mod snap;

pub use command::EditCommand;
pub use editor::{Editor, EditorConfig};
pub use error::{EditorError, Result};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use listener::{notification, CountNotifier, PreviewListener};
pub use registry::{TubePatch, TubeRegistry};
pub use snap::snap_angle;
