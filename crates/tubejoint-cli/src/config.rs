//! `tubejoint.toml` loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tubejoint_detect::DetectorConfig;
use tubejoint_editor::{EditorConfig, DEFAULT_HISTORY_LIMIT};

/// `[editor]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    pub history_limit: usize,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Contents of a config file. Missing tables and keys take defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub detector: DetectorConfig,
    pub editor: EditorSection,
}

impl CliConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path`, or use defaults when no path was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply a `--threshold` flag on top of the file.
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        if let Some(t) = threshold {
            self.detector.proximity_threshold = t;
        }
        self
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            history_limit: self.editor.history_limit,
            detector: self.detector.clone(),
        }
    }
}
