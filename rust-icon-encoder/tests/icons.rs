use rust_icon_encoder::{
    image::{Bitmap, ImageEncoder, Rgba},
    pattern::generate,
    png::{read_chunks, PNGEncoder, PNGInfo},
    Error,
};

const BLUE: Rgba = Rgba::from_hex(0x3b82f6);
const DARK: Rgba = Rgba::from_hex(0x0f172a);

fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
    let decoder = png::Decoder::new(bytes);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info, buf)
}

/// Flips the row order of a tightly packed RGBA buffer.
fn flip_rows(data: &[u8], width: u32) -> Vec<u8> {
    data.chunks_exact(width as usize * 4)
        .rev()
        .flatten()
        .copied()
        .collect()
}

fn check_round_trip(size: u32, thickness: u32) {
    let bitmap = generate(size, size, thickness, BLUE, DARK);
    let bytes = PNGEncoder::new(&bitmap).encode().unwrap();

    let (info, pixels) = decode(&bytes);
    assert_eq!((info.width, info.height), (size, size));
    assert_eq!(info.color_type, png::ColorType::Rgba);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    assert_eq!(pixels.len(), (size * size * 4) as usize);
    assert_eq!(flip_rows(&pixels, size), bitmap.data);
}

#[test]
fn small_icon_round_trip() {
    check_round_trip(192, 10);
}

#[test]
fn large_icon_round_trip() {
    check_round_trip(512, 20);
}

#[test]
fn row_order_is_reversed() {
    // bottom half blue, top half dark, in bitmap (bottom-up) order
    let mut data = vec![];
    for y in 0..4u32 {
        let color = if y < 2 { BLUE } else { DARK };
        for _ in 0..3 {
            data.extend_from_slice(color.as_bytes());
        }
    }
    let bitmap = Bitmap {
        channels: 4,
        size: (3, 4),
        data,
    };

    let (_, pixels) = decode(&PNGEncoder::new(&bitmap).encode().unwrap());
    // decoders read top-down, so the first decoded row is the bitmap's last
    assert_eq!(pixels[..4], *DARK.as_bytes());
    assert_eq!(pixels[pixels.len() - 4..], *BLUE.as_bytes());
}

#[test]
fn headers_report_dimensions() {
    let small = PNGEncoder::new(&generate(192, 192, 10, BLUE, DARK))
        .encode()
        .unwrap();
    let large = PNGEncoder::new(&generate(512, 512, 20, BLUE, DARK))
        .encode()
        .unwrap();

    let small = PNGInfo::from_bytes(&small).unwrap();
    let large = PNGInfo::from_bytes(&large).unwrap();
    assert_eq!((small.header.width, small.header.height), (192, 192));
    assert_eq!((large.header.width, large.header.height), (512, 512));
    assert_eq!(large.chunk_tags, ["IHDR", "IDAT", "IEND"]);
}

#[test]
fn every_chunk_checksum_is_verified() {
    let bytes = PNGEncoder::new(&generate(32, 32, 4, BLUE, DARK))
        .encode()
        .unwrap();
    assert!(read_chunks(&bytes).is_ok());

    // one byte inside each chunk: IHDR width, IDAT payload, IEND crc
    let idat_payload = 8 + 25 + 8;
    for offset in [16, idat_payload + 2, bytes.len() - 1] {
        let mut corrupt = bytes.clone();
        corrupt[offset] ^= 0x01;
        assert!(
            matches!(read_chunks(&corrupt), Err(Error::ChecksumMismatch { .. })),
            "corruption at {offset} went unnoticed"
        );
    }
}

#[test]
fn encode_to_file_writes_whole_image() {
    let bitmap = generate(192, 192, 10, BLUE, DARK);
    let encoder = PNGEncoder::new(&bitmap);
    let path = std::env::temp_dir().join(format!("icon-192-{}.png", std::process::id()));

    encoder.encode_to_file(&path).unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, encoder.encode().unwrap());
}

#[test]
fn encode_to_file_surfaces_io_errors() {
    let bitmap = generate(8, 8, 1, BLUE, DARK);
    let path = std::env::temp_dir()
        .join("rust-icon-encoder-missing-dir")
        .join("icon.png");
    assert!(matches!(
        PNGEncoder::new(&bitmap).encode_to_file(&path),
        Err(Error::Io(_))
    ));
}
