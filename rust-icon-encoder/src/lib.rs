#![warn(missing_docs)]

//! Builds simple framed icon bitmaps and encodes them as PNG files.
mod error;
/// Defines types for holding and encoding images
pub mod image;
/// Solid border / interior bitmap generator
pub mod pattern;
/// Encoder for PNG images
pub mod png;

pub use error::{Error, Result};
