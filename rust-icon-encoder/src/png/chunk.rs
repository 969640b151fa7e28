use byteorder::{BigEndian, WriteBytesExt};
use flate2::Crc;
use tracing::trace;

use crate::error::{Error, Result};

/// Largest payload a single chunk may carry (2^31 - 1)
pub const MAX_CHUNK_LENGTH: usize = 0x7FFF_FFFF;

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// CRC-32 of a chunk, computed over its type tag followed by its payload.
pub fn chunk_crc(tag: &[u8; 4], payload: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(payload);
    crc.sum()
}

/// Appends a length-prefixed, CRC-terminated chunk to `out`.
pub fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_CHUNK_LENGTH {
        return Err(Error::UnsupportedFeature(
            "Chunk payload is longer than 2^31 - 1 bytes",
        ));
    }

    out.reserve(payload.len() + 12);
    out.write_u32::<BigEndian>(payload.len() as u32)?;
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.write_u32::<BigEndian>(chunk_crc(tag, payload))?;

    trace!(
        tag = %String::from_utf8_lossy(tag),
        length = payload.len(),
        "wrote chunk"
    );
    Ok(())
}

#[test]
fn empty_end_chunk() {
    let mut out = vec![];
    write_chunk(&mut out, &IEND, &[]).unwrap();
    #[rustfmt::skip]
    let expected = [
        0, 0, 0, 0,             // Length
        b'I', b'E', b'N', b'D', // Type
        0xAE, 0x42, 0x60, 0x82, // CRC
    ];
    assert_eq!(out, expected);
}

#[test]
fn crc_covers_tag_and_payload() {
    // Reference value for the ASCII string "123456789"
    assert_eq!(chunk_crc(b"1234", b"56789"), 0xCBF4_3926);
    assert_ne!(chunk_crc(&IDAT, &[0]), chunk_crc(&IDAT, &[1]));
}
