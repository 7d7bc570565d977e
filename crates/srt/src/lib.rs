//! SubRip (SRT) reader and writer.

pub mod config;
mod reader;
mod timecode;
mod writer;

pub use reader::to_model;
pub use writer::from_model;
