//! SCC reader and writer configuration.

use serde::Deserialize;

use model::styles::TextAlign;
use model::times::{FrameRate, FPS_29_97, FPS_30};

/// Paragraph text alignment selection for the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Auto,
    Left,
    Center,
    Right,
}

impl TextAlignment {
    pub fn text_align(self) -> TextAlign {
        match self {
            TextAlignment::Auto | TextAlignment::Left => TextAlign::Start,
            TextAlignment::Center => TextAlign::Center,
            TextAlignment::Right => TextAlign::End,
        }
    }
}

/// `scc_reader` configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SccReaderConfiguration {
    pub text_align: TextAlignment,
}

/// Frame rates the writer can emit time codes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SccWriterFrameRate {
    #[serde(rename = "30NDF")]
    Fps30Ndf,
    #[serde(rename = "29.97NDF")]
    Fps2997Ndf,
    #[default]
    #[serde(rename = "29.97DF")]
    Fps2997Df,
}

impl SccWriterFrameRate {
    pub fn frame_rate(self) -> FrameRate {
        match self {
            SccWriterFrameRate::Fps30Ndf => FPS_30,
            SccWriterFrameRate::Fps2997Ndf | SccWriterFrameRate::Fps2997Df => FPS_29_97,
        }
    }

    pub fn drop_frame(self) -> bool {
        self == SccWriterFrameRate::Fps2997Df
    }
}

/// `scc_writer` configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SccWriterConfiguration {
    /// Re-wraps lines wider than 32 cells instead of failing.
    pub allow_reflow: bool,
    /// Emits pop-on chunks even for roll-up-shaped content.
    pub force_popon: bool,
    /// Roll-up window depth used when roll-up chunks are emitted.
    pub rollup_lines: u8,
    pub frame_rate: SccWriterFrameRate,
    /// Time code of the first frame, `HH:MM:SS:FF` or `HH:MM:SS;FF`.
    pub start_tc: Option<String>,
}

impl Default for SccWriterConfiguration {
    fn default() -> Self {
        Self {
            allow_reflow: false,
            force_popon: false,
            rollup_lines: 4,
            frame_rate: SccWriterFrameRate::default(),
            start_tc: None,
        }
    }
}
