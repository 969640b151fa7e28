/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Describes an error encountered while building, encoding or inspecting an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image is malformed in some way. The string describes how.
    #[error("malformed image: {0}")]
    Malformed(&'static str),
    /// A feature is not supported by the encoder
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(&'static str),
    /// Width or height is zero
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// The pixel data does not hold exactly width * height * channels bytes
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        /// Bytes implied by the image size
        expected: usize,
        /// Bytes actually present
        actual: usize,
    },
    /// A chunk's stored CRC does not match its contents
    #[error("CRC mismatch in {tag} chunk: stored {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        /// Four-character chunk type
        tag: String,
        /// CRC stored in the file
        expected: u32,
        /// CRC computed over the tag and payload
        actual: u32,
    },
    /// There was an error writing the image or compressing its data
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
