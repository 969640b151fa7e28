use tracing::trace;

use crate::image::{Bitmap, Rgba, RGBA_CHANNELS};

/// A solid frame of `border` color around a solid `interior`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderPattern {
    /// Width of the frame in pixels, measured from each edge
    pub thickness: u32,
    /// Color of the frame
    pub border: Rgba,
    /// Color inside the frame
    pub interior: Rgba,
}

impl BorderPattern {
    /// Returns true if `(x, y)` falls within `thickness` of any edge.
    pub fn is_border(&self, x: u32, y: u32, size: (u32, u32)) -> bool {
        let t = self.thickness;
        x < t || x >= size.0.saturating_sub(t) || y < t || y >= size.1.saturating_sub(t)
    }

    /// Renders the pattern into a new RGBA bitmap of the given size.
    pub fn render(&self, width: u32, height: u32) -> Bitmap {
        let size = (width, height);
        let mut data = Vec::with_capacity(width as usize * height as usize * RGBA_CHANNELS as usize);
        for y in 0..height {
            for x in 0..width {
                let color = if self.is_border(x, y, size) {
                    self.border
                } else {
                    self.interior
                };
                data.extend_from_slice(color.as_bytes());
            }
        }
        trace!(width, height, thickness = self.thickness, "rendered border pattern");

        Bitmap {
            channels: RGBA_CHANNELS,
            size,
            data,
        }
    }
}

/// Generates a `width` x `height` bitmap with a `border_thickness` frame.
pub fn generate(
    width: u32,
    height: u32,
    border_thickness: u32,
    border_color: Rgba,
    interior_color: Rgba,
) -> Bitmap {
    BorderPattern {
        thickness: border_thickness,
        border: border_color,
        interior: interior_color,
    }
    .render(width, height)
}
