use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Number of bytes per pixel in an RGBA bitmap
pub const RGBA_CHANNELS: u8 = 4;

/// A single RGBA color, one byte per channel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Builds an opaque color from a `0xRRGGBB` value. The top byte is ignored.
    pub const fn from_hex(rgb: u32) -> Self {
        Self([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xFF])
    }

    /// The color as raw channel bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

/// Stores a single frame of image data in a simple bitmap form.
///
/// Rows are stored bottom-up: row 0 of `data` is the bottom row of the picture.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// The number of color channels in the image. Ex. RGBA = 4
    pub channels: u8,

    /// The size of the image
    pub size: (u32, u32),
    /// The raw bitmap data
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Number of bytes in one row of pixels
    pub fn stride(&self) -> usize {
        self.size.0 as usize * self.channels as usize
    }

    /// Returns the bytes of the pixel at `(x, y)`, or `None` if out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        let channels = self.channels as usize;
        let index = y as usize * self.stride() + x as usize * channels;
        self.data.get(index..index + channels)
    }

    /// Checks that the size is non-zero and the data length matches it exactly.
    pub fn validate(&self) -> Result<()> {
        check_frame(self.data.len(), self.size, self.channels)
    }
}

/// Checks a `size` frame of `channels`-byte pixels against its data length.
pub(crate) fn check_frame(len: usize, size: (u32, u32), channels: u8) -> Result<()> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * channels as usize;
    if len != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Used to encode an image. This trait can be implemented for any image format I want to encode.
pub trait ImageEncoder<'bitmap> {
    /// Supplies the encoder with a raw bitmap to encode.
    fn new(bitmap: &'bitmap Bitmap) -> Self;

    /// Encodes the bitmap into a complete in-memory file.
    fn encode(&self) -> Result<Vec<u8>>;

    /// Encodes the bitmap and saves the result to a file at the given path.
    ///
    /// The whole file is built before anything touches the disk, so an encoding
    /// failure never leaves a partial file behind.
    fn encode_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.encode()?;
        debug!(path = %path.as_ref().display(), bytes = bytes.len(), "writing image");
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[test]
fn hex_colors() {
    assert_eq!(Rgba::from_hex(0x3b82f6), Rgba([0x3b, 0x82, 0xf6, 0xff]));
    assert_eq!(Rgba::from_hex(0xff0f172a), Rgba([0x0f, 0x17, 0x2a, 0xff]));
}

#[test]
fn validate_rejects_bad_bitmaps() {
    let empty = Bitmap {
        channels: RGBA_CHANNELS,
        size: (0, 4),
        data: vec![],
    };
    assert!(matches!(
        empty.validate(),
        Err(Error::InvalidDimensions { width: 0, height: 4 })
    ));

    let short = Bitmap {
        channels: RGBA_CHANNELS,
        size: (2, 2),
        data: vec![0; 15],
    };
    assert!(matches!(
        short.validate(),
        Err(Error::BufferSizeMismatch {
            expected: 16,
            actual: 15
        })
    ));
}

#[test]
fn pixel_lookup() {
    let bitmap = Bitmap {
        channels: RGBA_CHANNELS,
        size: (2, 1),
        data: vec![1, 2, 3, 4, 5, 6, 7, 8],
    };
    assert_eq!(bitmap.pixel(1, 0), Some(&[5, 6, 7, 8][..]));
    assert_eq!(bitmap.pixel(2, 0), None);
}
