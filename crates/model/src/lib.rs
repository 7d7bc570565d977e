//! Canonical document model for timed text.
//!
//! Every supported caption format is read into this model and written from
//! it. The model is a TTML-shaped tree constrained by IMSC 1.1 Text
//! Profile: a [`Document`] with out-of-line regions, a content hierarchy
//! rooted in a body, inline styles drawn from a closed vocabulary, and
//! exact rational timing.

mod content;
mod document;
mod error;
pub mod properties;
pub mod styles;
pub mod timecode;
pub mod times;

pub use content::{AnimationStep, ElementKind};
pub use document::{
    ActiveArea, CellResolution, Document, NodeId, PixelResolution,
};
pub use error::Error;
pub use properties::{StyleProperty, StyleValue};
