//! Simple rendering on pixel grids
//!
//! Only what the overlays need: solid colors and clipped filled
//! rectangles.

use super::{PixMut, PixelDepth};
use crate::color;

/// RGB color for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// White color
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Red color
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    /// Green color
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    /// Blue color
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };
    /// Yellow color
    pub const YELLOW: Color = Color {
        r: 255,
        g: 255,
        b: 0,
    };

    /// Convert to an 8-bit luma value.
    pub fn to_gray(&self) -> u8 {
        color::luma(self.r, self.g, self.b)
    }

    /// Compose as 32-bit RGBA pixel
    pub fn to_pixel32(&self) -> u32 {
        color::compose_rgb(self.r, self.g, self.b)
    }

    /// Pixel value representing this color at `depth`.
    ///
    /// Colors are reduced to luma below 32 bpp; 1 bpp maps dark colors
    /// to `0` and light colors to `1`.
    pub fn to_pixel(&self, depth: PixelDepth) -> u32 {
        let gray = self.to_gray() as u32;
        match depth {
            PixelDepth::Bit32 => self.to_pixel32(),
            PixelDepth::Bit1 => u32::from(gray >= 128),
            PixelDepth::Bit16 => gray * 257,
            d => gray >> (8 - d.bits()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl PixMut {
    /// Fill a rectangle with a raw pixel value.
    ///
    /// The rectangle is clipped to the image; a rectangle entirely
    /// outside is a no-op.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, val: u32) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width() as i64);
        let y1 = (y as i64 + h as i64).min(self.height() as i64);
        let val = val & self.depth().max_value();
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel_unchecked(px as u32, py as u32, val);
            }
        }
    }

    /// Fill a rectangle with a color converted to this image's depth.
    pub fn fill_rect_color(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let val = color.to_pixel(self.depth());
        self.fill_rect(x, y, w, h, val);
    }

    /// Set every pixel to a color converted to this image's depth.
    pub fn fill_color(&mut self, color: Color) {
        let val = color.to_pixel(self.depth());
        self.set_all_arbitrary(val);
    }
}
