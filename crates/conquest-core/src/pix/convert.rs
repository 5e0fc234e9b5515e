//! Pixel depth conversion functions
//!
//! Conversions between the three depths the map engine works with:
//! 1 bpp masks, 8 bpp grayscale scan grids and 32 bpp RGB renders.
//!
//! At 1 bpp a `0` pixel is black and a `1` pixel is white, matching how
//! masks are stored on disk.

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::Result;

/// Gray level below which a pixel becomes black when thresholded to 1 bpp.
pub const MASK_THRESHOLD: u32 = 128;

impl Pix {
    /// Convert to 8 bpp grayscale.
    ///
    /// 32 bpp input uses the ITU-R 601-2 luma transform; lower depths are
    /// scaled linearly to `0..=255`.
    ///
    /// ```
    /// use conquest_core::{Pix, PixelDepth};
    ///
    /// let rgb = Pix::new(10, 10, PixelDepth::Bit32).unwrap();
    /// let gray = rgb.to_gray().unwrap();
    /// assert_eq!(gray.depth(), PixelDepth::Bit8);
    /// ```
    pub fn to_gray(&self) -> Result<Pix> {
        let depth = self.depth();
        if depth == PixelDepth::Bit8 {
            return Ok(self.deep_clone());
        }
        let (w, h) = (self.width(), self.height());
        let mut out = Pix::new(w, h, PixelDepth::Bit8)?.into_mut();
        let max = depth.max_value();
        for y in 0..h {
            for x in 0..w {
                let val = self.get_pixel_unchecked(x, y);
                let gray = match depth {
                    PixelDepth::Bit32 => {
                        let (r, g, b) = color::extract_rgb(val);
                        color::luma(r, g, b) as u32
                    }
                    PixelDepth::Bit16 => val >> 8,
                    _ => val * 255 / max,
                };
                out.set_pixel_unchecked(x, y, gray);
            }
        }
        Ok(out.into())
    }

    /// Convert to 32 bpp RGB.
    pub fn to_rgb(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit32 {
            return Ok(self.deep_clone());
        }
        let gray = self.to_gray()?;
        let (w, h) = (self.width(), self.height());
        let mut out = Pix::new(w, h, PixelDepth::Bit32)?.into_mut();
        for y in 0..h {
            for x in 0..w {
                let g = gray.get_pixel_unchecked(x, y) as u8;
                out.set_pixel_unchecked(x, y, color::compose_rgb(g, g, g));
            }
        }
        Ok(out.into())
    }

    /// Convert to a 1 bpp mask.
    ///
    /// Pixels darker than [`MASK_THRESHOLD`] become `0` (filled), all
    /// others become `1`.
    pub fn to_mask(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit1 {
            return Ok(self.deep_clone());
        }
        let gray = self.to_gray()?;
        let (w, h) = (self.width(), self.height());
        let mut out = Pix::new(w, h, PixelDepth::Bit1)?.into_mut();
        for y in 0..h {
            for x in 0..w {
                let bit = u32::from(gray.get_pixel_unchecked(x, y) >= MASK_THRESHOLD);
                out.set_pixel_unchecked(x, y, bit);
            }
        }
        Ok(out.into())
    }

    /// Photometric inversion.
    ///
    /// For 32 bpp images the color channels are inverted and alpha is kept.
    pub fn invert(&self) -> Pix {
        let mut out = self.to_mut();
        match self.depth() {
            PixelDepth::Bit32 => {
                for word in out.data_mut() {
                    *word ^= 0xffff_ff00;
                }
            }
            // Padding bits flip too but are never read.
            _ => {
                for word in out.data_mut() {
                    *word = !*word;
                }
            }
        }
        out.into()
    }
}
