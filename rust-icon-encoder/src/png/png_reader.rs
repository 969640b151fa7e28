use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;

use crate::{
    error::{Error, Result},
    png::{
        chunk::{chunk_crc, IDAT, IEND, IHDR},
        header::{Header, HEADER_LENGTH},
        PNG_SIGNATURE,
    },
};

/// A single chunk borrowed from an encoded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'data> {
    /// Four-character chunk type
    pub tag: [u8; 4],
    /// Chunk payload
    pub data: &'data [u8],
    /// CRC stored after the payload
    pub crc: u32,
}

impl Chunk<'_> {
    /// The chunk type as text, with invalid bytes replaced
    pub fn tag_name(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

pub struct PNGParser<'data> {
    cursor: Cursor<&'data [u8]>,
}

impl<'data> PNGParser<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn read_signature(&mut self) -> Result<()> {
        let signature = self.read_next_bytes(PNG_SIGNATURE.len())?;
        if signature != PNG_SIGNATURE {
            return Err(Error::Malformed("Missing PNG signature"));
        }
        Ok(())
    }

    pub fn read_next_dword(&mut self) -> Result<u32> {
        match self.cursor.read_u32::<BigEndian>() {
            Ok(val) => Ok(val),
            Err(_) => Err(Error::Malformed("Unexpected end of input")),
        }
    }

    pub fn read_next_bytes(&mut self, count: usize) -> Result<&'data [u8]> {
        let data = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let end = start
            .checked_add(count)
            .filter(|end| *end <= data.len())
            .ok_or(Error::Malformed("Unexpected end of input"))?;
        self.cursor.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Reads one chunk and checks its CRC.
    pub fn read_next_chunk(&mut self) -> Result<Chunk<'data>> {
        let length = self.read_next_dword()? as usize;
        let mut tag = [0u8; 4];
        tag.copy_from_slice(self.read_next_bytes(4)?);
        let data = self.read_next_bytes(length)?;
        let crc = self.read_next_dword()?;

        let computed = chunk_crc(&tag, data);
        if computed != crc {
            return Err(Error::ChecksumMismatch {
                tag: String::from_utf8_lossy(&tag).into_owned(),
                expected: crc,
                actual: computed,
            });
        }
        Ok(Chunk { tag, data, crc })
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.position() as usize >= self.cursor.get_ref().len()
    }
}

/// Walks every chunk of an encoded file, verifying the signature, each CRC and
/// the IHDR-first / IEND-last ordering. Pixel data is not inflated.
pub fn read_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let mut reader = PNGParser::new(data);
    reader.read_signature()?;

    let mut chunks: Vec<Chunk> = vec![];
    loop {
        let chunk = reader.read_next_chunk()?;
        match chunk.tag {
            IHDR if !chunks.is_empty() => {
                return Err(Error::Malformed("IHDR chunk must appear exactly once, first"))
            }
            IHDR if chunk.data.len() != HEADER_LENGTH => {
                return Err(Error::Malformed("IHDR chunk must be 13 bytes long"))
            }
            IEND if !chunk.data.is_empty() => {
                return Err(Error::Malformed("IEND chunk must be empty"))
            }
            _ if chunks.is_empty() && chunk.tag != IHDR => {
                return Err(Error::Malformed("First chunk must be IHDR"))
            }
            _ => {}
        }

        let is_end = chunk.tag == IEND;
        chunks.push(chunk);
        if is_end {
            break;
        }
    }

    if !reader.is_at_end() {
        return Err(Error::Malformed("Trailing data after IEND chunk"));
    }
    if !chunks.iter().any(|c| c.tag == IDAT) {
        return Err(Error::Malformed("No IDAT chunk"));
    }
    Ok(chunks)
}

/// Summary of an encoded file's structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PNGInfo {
    /// The parsed IHDR chunk
    pub header: Header,
    /// Chunk types in file order
    pub chunk_tags: Vec<String>,
    /// Total compressed bytes across all IDAT chunks
    pub image_data_length: usize,
}

impl PNGInfo {
    /// Validates the file structure and summarizes it.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let chunks = read_chunks(data)?;
        let header = Header::from_bytes(chunks[0].data)?;
        let image_data_length = chunks
            .iter()
            .filter(|c| c.tag == IDAT)
            .map(|c| c.data.len())
            .sum();

        Ok(Self {
            header,
            chunk_tags: chunks.iter().map(Chunk::tag_name).collect(),
            image_data_length,
        })
    }
}

#[rustfmt::skip]
#[allow(dead_code)]
static TEST_FILE: [u8; 57] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, // Signature
    0, 0, 0, 13,                // Length
    b'I', b'H', b'D', b'R',
    0, 0, 0, 1,                 // Width
    0, 0, 0, 1,                 // Height
    8, 6, 0, 0, 0,
    0x1F, 0x15, 0xC4, 0x89,     // CRC
    0, 0, 0, 0,                 // Length
    b'I', b'D', b'A', b'T',
    0x35, 0xAF, 0x06, 0x1E,     // CRC
    0, 0, 0, 0,                 // Length
    b'I', b'E', b'N', b'D',
    0xAE, 0x42, 0x60, 0x82,     // CRC
];

#[test]
fn read_file_structure() {
    let info = PNGInfo::from_bytes(&TEST_FILE).unwrap();
    assert_eq!(info.header, Header::rgba8(1, 1));
    assert_eq!(info.chunk_tags, ["IHDR", "IDAT", "IEND"]);
    assert_eq!(info.image_data_length, 0);
}

#[test]
fn reject_corrupt_crc() {
    let mut file = TEST_FILE;
    file[24] = 16; // Bit depth
    assert!(matches!(
        read_chunks(&file),
        Err(Error::ChecksumMismatch { ref tag, .. }) if tag == "IHDR"
    ));
}

#[test]
fn reject_bad_structure() {
    assert!(read_chunks(&TEST_FILE[1..]).is_err());
    assert!(read_chunks(&TEST_FILE[..50]).is_err());

    let mut trailing = TEST_FILE.to_vec();
    trailing.push(0);
    assert!(read_chunks(&trailing).is_err());

    let mut missing_header = TEST_FILE[..8].to_vec();
    missing_header.extend_from_slice(&TEST_FILE[33..]);
    assert!(matches!(
        read_chunks(&missing_header),
        Err(Error::Malformed("First chunk must be IHDR"))
    ));
}

#[test]
fn reject_short_header_chunk() {
    let payload = &TEST_FILE[16..28];
    let mut file = TEST_FILE[..8].to_vec();
    file.extend_from_slice(&[0, 0, 0, 12]);
    file.extend_from_slice(&IHDR);
    file.extend_from_slice(payload);
    file.extend_from_slice(&chunk_crc(&IHDR, payload).to_be_bytes());
    file.extend_from_slice(&TEST_FILE[33..]);

    assert!(matches!(
        read_chunks(&file),
        Err(Error::Malformed("IHDR chunk must be 13 bytes long"))
    ));
}
