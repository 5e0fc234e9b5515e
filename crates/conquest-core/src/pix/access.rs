//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. For example,
//! in a 1-bit image, pixel 0 occupies bit 31 (MSB) of the first word.

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

#[inline]
fn read_packed(line: &[u32], depth: PixelDepth, x: u32) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit2 => get_data_dibit(line, x),
        PixelDepth::Bit4 => get_data_qbit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        PixelDepth::Bit32 => line[x as usize],
    }
}

#[inline]
fn write_packed(line: &mut [u32], depth: PixelDepth, x: u32, val: u32) {
    match depth {
        PixelDepth::Bit1 => set_data_bit(line, x, val),
        PixelDepth::Bit2 => set_data_dibit(line, x, val),
        PixelDepth::Bit4 => set_data_qbit(line, x, val),
        PixelDepth::Bit8 => set_data_byte(line, x, val),
        PixelDepth::Bit16 => set_data_two_bytes(line, x, val),
        PixelDepth::Bit32 => line[x as usize] = val,
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), self.depth(), x)
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.depth() != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(color::extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), self.depth(), x)
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        write_packed(self.row_data_mut(y), depth, x, val);
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}

/// Get a 1-bit pixel value.
#[inline]
pub fn get_data_bit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 5) as usize] >> (31 - (x & 31))) & 1
}

/// Set a 1-bit pixel value.
#[inline]
pub fn set_data_bit(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 5) as usize];
    let shift = 31 - (x & 31);
    *word = (*word & !(1 << shift)) | ((val & 1) << shift);
}

/// Get a 2-bit pixel value.
#[inline]
pub fn get_data_dibit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 4) as usize] >> (2 * (15 - (x & 15)))) & 3
}

/// Set a 2-bit pixel value.
#[inline]
pub fn set_data_dibit(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 4) as usize];
    let shift = 2 * (15 - (x & 15));
    *word = (*word & !(3 << shift)) | ((val & 3) << shift);
}

/// Get a 4-bit pixel value.
#[inline]
pub fn get_data_qbit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 3) as usize] >> (4 * (7 - (x & 7)))) & 0xf
}

/// Set a 4-bit pixel value.
#[inline]
pub fn set_data_qbit(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 3) as usize];
    let shift = 4 * (7 - (x & 7));
    *word = (*word & !(0xf << shift)) | ((val & 0xf) << shift);
}

/// Get an 8-bit pixel value.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    (line[(x >> 2) as usize] >> (8 * (3 - (x & 3)))) & 0xff
}

/// Set an 8-bit pixel value.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 2) as usize];
    let shift = 8 * (3 - (x & 3));
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

/// Get a 16-bit pixel value.
#[inline]
pub fn get_data_two_bytes(line: &[u32], x: u32) -> u32 {
    (line[(x >> 1) as usize] >> (16 * (1 - (x & 1)))) & 0xffff
}

/// Set a 16-bit pixel value.
#[inline]
pub fn set_data_two_bytes(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 1) as usize];
    let shift = 16 * (1 - (x & 1));
    *word = (*word & !(0xffff << shift)) | ((val & 0xffff) << shift);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_packing_msb_first() {
        let mut line = [0u32; 2];
        set_data_bit(&mut line, 0, 1);
        assert_eq!(line[0], 0x8000_0000);
        set_data_bit(&mut line, 33, 1);
        assert_eq!(line[1], 0x4000_0000);
        assert_eq!(get_data_bit(&line, 33), 1);
        set_data_bit(&mut line, 0, 0);
        assert_eq!(line[0], 0);
    }

    #[test]
    fn test_byte_packing() {
        let mut line = [0u32; 1];
        set_data_byte(&mut line, 0, 0xAB);
        set_data_byte(&mut line, 3, 0xCD);
        assert_eq!(line[0], 0xAB00_00CD);
        assert_eq!(get_data_byte(&line, 0), 0xAB);
        assert_eq!(get_data_byte(&line, 3), 0xCD);
    }

    #[test]
    fn test_all_depths_roundtrip() {
        for depth in [
            PixelDepth::Bit1,
            PixelDepth::Bit2,
            PixelDepth::Bit4,
            PixelDepth::Bit8,
            PixelDepth::Bit16,
            PixelDepth::Bit32,
        ] {
            let pix = Pix::new(37, 3, depth).unwrap();
            let mut pm = pix.try_into_mut().unwrap();
            let val = depth.max_value();
            pm.set_pixel(36, 2, val).unwrap();
            pm.set_pixel(1, 0, val).unwrap();
            assert_eq!(pm.get_pixel(36, 2), Some(val), "depth {:?}", depth);
            assert_eq!(pm.get_pixel(35, 2), Some(0), "depth {:?}", depth);
            assert_eq!(pm.get_pixel(1, 0), Some(val), "depth {:?}", depth);
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let pix = Pix::new(5, 5, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.get_pixel(5, 0), None);
        let mut pm = pix.try_into_mut().unwrap();
        assert!(pm.set_pixel(0, 5, 1).is_err());
    }

    #[test]
    fn test_rgb_access() {
        let pix = Pix::new(3, 3, PixelDepth::Bit32).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_rgb(2, 1, 1, 2, 3).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(2, 1), Some((1, 2, 3)));

        let gray = Pix::new(3, 3, PixelDepth::Bit8).unwrap();
        assert_eq!(gray.get_rgb(0, 0), None);
    }
}
