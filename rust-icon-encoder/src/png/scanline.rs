use tracing::debug;

/// Filter type byte for an unfiltered scanline
pub const FILTER_NONE: u8 = 0;

/// Lays out `height` rows of `stride` bytes as PNG scanlines.
///
/// Bitmap rows are stored bottom-up while PNG stores them top-down, so the
/// row order is reversed: bitmap row `i` becomes scanline `height - 1 - i`.
/// Each scanline is prefixed with a `FILTER_NONE` byte. The frame must
/// already be validated; `stride` is non-zero and divides `data` exactly.
pub(crate) fn frame_scanlines(data: &[u8], stride: usize, height: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), stride * height, "unvalidated frame");
    let mut raw = Vec::with_capacity(height * (stride + 1));

    for row in data.chunks_exact(stride).rev() {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(row);
    }

    debug!(rows = height, stride, bytes = raw.len(), "framed scanlines");
    raw
}

#[test]
fn rows_are_reversed_and_prefixed() {
    #[rustfmt::skip]
    let data = [
        1, 1, 1, 1, // Bottom row
        2, 2, 2, 2,
        3, 3, 3, 3, // Top row
    ];
    assert_eq!(
        frame_scanlines(&data, 4, 3),
        vec![0, 3, 3, 3, 3, 0, 2, 2, 2, 2, 0, 1, 1, 1, 1]
    );
}

#[test]
fn framed_length() {
    let data = vec![0xAB; 5 * 7 * 4];
    let raw = frame_scanlines(&data, 5 * 4, 7);
    assert_eq!(raw.len(), 7 * (1 + 5 * 4));
    assert!(raw.chunks_exact(21).all(|line| line[0] == FILTER_NONE));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "unvalidated frame")]
fn partial_row_is_not_dropped() {
    frame_scanlines(&[0; 10], 4, 2);
}
