//! WebVTT writer configuration.

use serde::Deserialize;

/// `vtt_writer` configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VttWriterConfiguration {
    /// Emit `line` and line-alignment cue settings.
    pub line_position: bool,
    /// Emit text-alignment cue settings.
    pub text_align: bool,
    /// Emit cue identifiers.
    pub cue_id: bool,
}

impl Default for VttWriterConfiguration {
    fn default() -> Self {
        Self { line_position: false, text_align: false, cue_id: true }
    }
}
