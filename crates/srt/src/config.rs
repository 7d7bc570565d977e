//! SRT writer configuration.

use serde::Deserialize;

/// `srt_writer` configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SrtWriterConfiguration {
    /// Emit `<b>`, `<i>`, `<u>` and `<font>` formatting tags.
    pub text_formatting: bool,
}

impl Default for SrtWriterConfiguration {
    fn default() -> Self {
        Self { text_formatting: true }
    }
}
