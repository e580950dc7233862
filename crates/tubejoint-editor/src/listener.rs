//! Consumers of fresh preview lists.

use tracing::info;
use tubejoint_detect::JointPreview;

/// Receives every preview list the editor computes after a state change.
///
/// Renderers place markers from the full list; notifiers only need the count.
pub trait PreviewListener {
    /// Called with the complete, freshly computed previews.
    fn previews_changed(&mut self, previews: &[JointPreview]);
}

impl<F> PreviewListener for F
where
    F: FnMut(&[JointPreview]),
{
    fn previews_changed(&mut self, previews: &[JointPreview]) {
        self(previews)
    }
}

/// Message shown for a detection pass, or `None` when nothing was found.
pub fn notification(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 potential joint detected".to_string()),
        n => Some(format!("{n} potential joints detected")),
    }
}

/// Notifier that logs the preview count and keeps the last message.
#[derive(Debug, Default)]
pub struct CountNotifier {
    last: Option<String>,
}

impl CountNotifier {
    /// Create a notifier with no message yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The message from the most recent non-empty pass.
    pub fn last_message(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl PreviewListener for CountNotifier {
    fn previews_changed(&mut self, previews: &[JointPreview]) {
        if let Some(msg) = notification(previews.len()) {
            info!("{msg}");
            self.last = Some(msg);
        }
    }
}
