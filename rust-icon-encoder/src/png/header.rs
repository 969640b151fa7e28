use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::io::Cursor;

use crate::error::{Error, Result};

/// Length of an IHDR payload
pub const HEADER_LENGTH: usize = 13;

/// Pixel layout declared by the IHDR color type byte
#[derive(PartialEq, Eq, FromPrimitive, Debug, Clone, Copy)]
#[allow(missing_docs)]
pub enum ColorType {
    Grayscale = 0,
    Truecolor = 2,
    Indexed = 3,
    GrayscaleAlpha = 4,
    TruecolorAlpha = 6,
}

impl ColorType {
    /// Samples per pixel for this color type
    pub fn channels(&self) -> u8 {
        match self {
            ColorType::Grayscale | ColorType::Indexed => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Truecolor => 3,
            ColorType::TruecolorAlpha => 4,
        }
    }
}

/// Contents of the IHDR chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per sample
    pub bit_depth: u8,
    /// Pixel layout
    pub color_type: ColorType,
    /// Compression method, always 0 (zlib)
    pub compression: u8,
    /// Filter method, always 0 (adaptive, five filter types)
    pub filter: u8,
    /// Interlace method, 0 for none
    pub interlace: u8,
}

impl Header {
    /// Header for an 8-bit RGBA image with no interlacing
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::TruecolorAlpha,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    /// Serializes the header into an IHDR payload
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(HEADER_LENGTH);
        payload.write_u32::<BigEndian>(self.width)?;
        payload.write_u32::<BigEndian>(self.height)?;
        payload.write_u8(self.bit_depth)?;
        payload.write_u8(self.color_type as u8)?;
        payload.write_u8(self.compression)?;
        payload.write_u8(self.filter)?;
        payload.write_u8(self.interlace)?;
        Ok(payload)
    }

    /// Parses an IHDR payload
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        if payload.len() != HEADER_LENGTH {
            return Err(Error::Malformed("IHDR chunk must be 13 bytes long"));
        }

        let mut cursor = Cursor::new(payload);
        let width = cursor.read_u32::<BigEndian>()?;
        let height = cursor.read_u32::<BigEndian>()?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let bit_depth = cursor.read_u8()?;
        let color_type = match FromPrimitive::from_u8(cursor.read_u8()?) {
            Some(color_type) => color_type,
            None => return Err(Error::Malformed("Unknown color type")),
        };

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            compression: cursor.read_u8()?,
            filter: cursor.read_u8()?,
            interlace: cursor.read_u8()?,
        })
    }
}

#[rustfmt::skip]
#[allow(dead_code)]
static TEST_HEADER: [u8; HEADER_LENGTH] = [
    0, 0, 0, 192,   // Width
    0, 0, 2, 0,     // Height
    8,              // Bit depth
    6,              // Color type
    0, 0, 0,        // Compression, filter, interlace
];

#[test]
fn write_header() {
    let header = Header::rgba8(192, 512);
    assert_eq!(header.to_bytes().unwrap(), TEST_HEADER);
}

#[test]
fn read_header() {
    let header = Header::from_bytes(&TEST_HEADER).unwrap();
    assert_eq!(header, Header::rgba8(192, 512));
    assert_eq!(header.color_type.channels(), 4);
}

#[test]
fn reject_bad_headers() {
    assert!(Header::from_bytes(&TEST_HEADER[..12]).is_err());

    let mut unknown_color = TEST_HEADER;
    unknown_color[9] = 5;
    assert!(matches!(
        Header::from_bytes(&unknown_color),
        Err(Error::Malformed(_))
    ));
}
