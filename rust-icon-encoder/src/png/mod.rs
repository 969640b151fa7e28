mod chunk;
mod header;
mod png_reader;
mod scanline;

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use tracing::debug;

pub use chunk::chunk_crc;
pub use header::{ColorType, Header};
pub use png_reader::{read_chunks, Chunk, PNGInfo};

use crate::{
    error::{Error, Result},
    image::{check_frame, Bitmap, ImageEncoder, RGBA_CHANNELS},
};
use header::HEADER_LENGTH;
use scanline::frame_scanlines;

/// Eight bytes every PNG file starts with
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Length, type and CRC fields surrounding every chunk payload
const CHUNK_OVERHEAD: usize = 12;

/// PNG encoder for 8-bit RGBA bitmaps.
///
/// Writes a single IDAT chunk compressed at the highest zlib level, with every
/// scanline left unfiltered.
pub struct PNGEncoder<'bitmap> {
    bitmap: &'bitmap Bitmap,
}

impl<'bitmap> ImageEncoder<'bitmap> for PNGEncoder<'bitmap> {
    fn new(bitmap: &'bitmap Bitmap) -> Self {
        Self { bitmap }
    }

    fn encode(&self) -> Result<Vec<u8>> {
        if self.bitmap.channels != RGBA_CHANNELS {
            return Err(Error::UnsupportedFeature(
                "Only 4 channel RGBA bitmaps can be encoded",
            ));
        }
        let (width, height) = self.bitmap.size;
        encode_frame(&self.bitmap.data, width, height)
    }
}

/// Encodes a bottom-up RGBA pixel buffer of the given size into a PNG file.
pub fn encode_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    encode_frame(data, width, height)
}

fn encode_frame(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    check_frame(data.len(), (width, height), RGBA_CHANNELS)?;

    let stride = width as usize * RGBA_CHANNELS as usize;
    let raw = frame_scanlines(data, stride, height as usize);
    let image_data = compress(&raw)?;
    debug!(
        width,
        height,
        raw = raw.len(),
        compressed = image_data.len(),
        "compressed image data"
    );

    let mut out = Vec::with_capacity(
        PNG_SIGNATURE.len() + 3 * CHUNK_OVERHEAD + HEADER_LENGTH + image_data.len(),
    );
    out.extend_from_slice(&PNG_SIGNATURE);
    let header = Header::rgba8(width, height).to_bytes()?;
    chunk::write_chunk(&mut out, &chunk::IHDR, &header)?;
    chunk::write_chunk(&mut out, &chunk::IDAT, &image_data)?;
    chunk::write_chunk(&mut out, &chunk::IEND, &[])?;
    Ok(out)
}

fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 4), Compression::best());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::ZlibDecoder;

    use super::*;
    use crate::image::Rgba;
    use crate::pattern::generate;

    const BLUE: Rgba = Rgba::from_hex(0x3b82f6);
    const DARK: Rgba = Rgba::from_hex(0x0f172a);

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = vec![];
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn file_layout() {
        let bitmap = generate(192, 192, 10, BLUE, DARK);
        let bytes = PNGEncoder::new(&bitmap).encode().unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);

        let chunks = read_chunks(&bytes).unwrap();
        let tags: Vec<String> = chunks.iter().map(Chunk::tag_name).collect();
        assert_eq!(tags, ["IHDR", "IDAT", "IEND"]);
        assert_eq!(
            Header::from_bytes(chunks[0].data).unwrap(),
            Header::rgba8(192, 192)
        );
        assert!(chunks[2].data.is_empty());
        assert_eq!(
            bytes[bytes.len() - 12..],
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn image_data_is_framed_scanlines() {
        let mut bitmap = generate(16, 4, 1, BLUE, DARK);
        // mark the bottom-left pixel so the row order is observable
        bitmap.data[..4].copy_from_slice(&[1, 2, 3, 4]);

        let bytes = PNGEncoder::new(&bitmap).encode().unwrap();
        let chunks = read_chunks(&bytes).unwrap();
        let raw = inflate(chunks[1].data);

        assert_eq!(raw, frame_scanlines(&bitmap.data, 16 * 4, 4));
        let last_line = &raw[3 * 65..];
        assert_eq!(last_line[..5], [0, 1, 2, 3, 4]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let bitmap = generate(64, 48, 5, BLUE, DARK);
        let first = PNGEncoder::new(&bitmap).encode().unwrap();
        let second = encode_rgba(&bitmap.data, 64, 48).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn encodes_borrowed_pixels() {
        let bitmap = generate(8, 8, 2, BLUE, DARK);
        let mut backing = bitmap.data.clone();
        backing.extend_from_slice(&[0xEE; 64]);

        let bytes = encode_rgba(&backing[..bitmap.data.len()], 8, 8).unwrap();
        assert_eq!(bytes, PNGEncoder::new(&bitmap).encode().unwrap());
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            encode_rgba(&[], 0, 0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_rgba(&[0; 12], 2, 2),
            Err(Error::BufferSizeMismatch {
                expected: 16,
                actual: 12
            })
        ));

        let rgb = Bitmap {
            channels: 3,
            size: (1, 1),
            data: vec![0; 3],
        };
        assert!(matches!(
            PNGEncoder::new(&rgb).encode(),
            Err(Error::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn compresses_solid_regions() {
        let bitmap = generate(512, 512, 20, BLUE, DARK);
        let bytes = PNGEncoder::new(&bitmap).encode().unwrap();
        let info = PNGInfo::from_bytes(&bytes).unwrap();
        assert!(info.image_data_length < bitmap.data.len() / 100);
        assert_eq!(
            bytes.len(),
            PNG_SIGNATURE.len() + 3 * CHUNK_OVERHEAD + HEADER_LENGTH + info.image_data_length
        );
    }
}
