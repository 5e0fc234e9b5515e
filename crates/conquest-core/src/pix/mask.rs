//! Region mask operations
//!
//! A region mask is a 1 bpp image the size of the map. Membership is
//! encoded the way masks are persisted on disk: [`MASK_FILLED`] marks a
//! pixel that belongs to the region (black), [`MASK_UNFILLED`] marks every
//! other pixel (white).

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

/// Mask bit for a pixel that belongs to the region.
pub const MASK_FILLED: u32 = 0;

/// Mask bit for a pixel outside the region.
pub const MASK_UNFILLED: u32 = 1;

fn check_mask(mask: &Pix) -> Result<()> {
    if mask.depth() != PixelDepth::Bit1 {
        return Err(Error::UnsupportedDepth(mask.depth().bits()));
    }
    Ok(())
}

/// Mask bits with padding bits past `width` cleared.
fn last_word_mask(width: u32) -> u32 {
    match width % 32 {
        0 => u32::MAX,
        rem => !(u32::MAX >> rem),
    }
}

impl Pix {
    /// Create an empty region mask: every pixel unfilled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new_mask(width: u32, height: u32) -> Result<Pix> {
        let mut pm = Pix::new(width, height, PixelDepth::Bit1)?.into_mut();
        pm.set_all();
        Ok(pm.into())
    }

    /// Create a region mask with the given points filled.
    ///
    /// Points outside the image are ignored.
    pub fn mask_from_points(width: u32, height: u32, points: &[(u32, u32)]) -> Result<Pix> {
        let mut pm = Pix::new_mask(width, height)?.into_mut();
        for &(x, y) in points {
            if x < width && y < height {
                pm.set_pixel_unchecked(x, y, MASK_FILLED);
            }
        }
        Ok(pm.into())
    }

    /// Filled points of a mask in row-major order (top row first,
    /// left to right within a row).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 1 bpp.
    pub fn filled_points(&self) -> Result<Vec<(u32, u32)>> {
        check_mask(self)?;
        let mut points = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get_pixel_unchecked(x, y) == MASK_FILLED {
                    points.push((x, y));
                }
            }
        }
        Ok(points)
    }

    /// Number of filled pixels in a mask.
    pub fn count_filled(&self) -> Result<u32> {
        check_mask(self)?;
        let wpl = self.wpl() as usize;
        let last = last_word_mask(self.width());
        let mut set_bits = 0u32;
        for y in 0..self.height() {
            let line = self.row_data(y);
            for (i, word) in line.iter().enumerate() {
                let word = if i + 1 == wpl { word & last } else { *word };
                set_bits += word.count_ones();
            }
        }
        Ok(self.width() * self.height() - set_bits)
    }

    /// First filled pixel in row-major order, i.e. the topmost filled
    /// pixel with ties broken by the smallest x.
    pub fn topmost_filled(&self) -> Result<Option<(u32, u32)>> {
        check_mask(self)?;
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get_pixel_unchecked(x, y) == MASK_FILLED {
                    return Ok(Some((x, y)));
                }
            }
        }
        Ok(None)
    }

    /// Bitwise AND of two same-sized 1 bpp masks.
    ///
    /// Because filled pixels are stored as `0`, the result is filled
    /// wherever either input is filled.
    ///
    /// # Errors
    ///
    /// Returns an error if either image is not 1 bpp or the sizes differ.
    pub fn logical_and(&self, other: &Pix) -> Result<Pix> {
        check_mask(self)?;
        check_mask(other)?;
        if !self.same_size(other) {
            return Err(Error::IncompatibleSizes(
                self.width(),
                self.height(),
                other.width(),
                other.height(),
            ));
        }
        let mut pm = self.to_mut();
        for (dst, src) in pm.data_mut().iter_mut().zip(other.data()) {
            *dst &= *src;
        }
        Ok(pm.into())
    }
}

impl PixMut {
    /// Set pixels to a value wherever the 1 bpp mask is filled.
    ///
    /// The mask is aligned to the upper-left corner. Only the
    /// overlapping region is processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the mask is not 1 bpp.
    pub fn set_masked(&mut self, mask: &Pix, val: u32) -> Result<()> {
        check_mask(mask)?;
        let val = val & self.depth().max_value();
        let w = self.width().min(mask.width());
        let h = self.height().min(mask.height());
        for y in 0..h {
            for x in 0..w {
                if mask.get_pixel_unchecked(x, y) == MASK_FILLED {
                    self.set_pixel_unchecked(x, y, val);
                }
            }
        }
        Ok(())
    }

    /// Copy pixels from `src` wherever the 1 bpp mask is filled.
    ///
    /// # Errors
    ///
    /// Returns an error if depths don't match or the mask is not 1 bpp.
    pub fn combine_masked(&mut self, src: &Pix, mask: &Pix) -> Result<()> {
        check_mask(mask)?;
        if src.depth() != self.depth() {
            return Err(Error::InvalidParameter(format!(
                "depth mismatch: {} vs {}",
                src.depth().bits(),
                self.depth().bits()
            )));
        }
        let w = self.width().min(mask.width()).min(src.width());
        let h = self.height().min(mask.height()).min(src.height());
        for y in 0..h {
            for x in 0..w {
                if mask.get_pixel_unchecked(x, y) == MASK_FILLED {
                    self.set_pixel_unchecked(x, y, src.get_pixel_unchecked(x, y));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mask_is_unfilled() {
        let mask = Pix::new_mask(40, 3).unwrap();
        assert_eq!(mask.count_filled().unwrap(), 0);
        assert_eq!(mask.get_pixel(39, 2), Some(MASK_UNFILLED));
        assert_eq!(mask.topmost_filled().unwrap(), None);
    }

    #[test]
    fn test_mask_from_points() {
        let mask = Pix::mask_from_points(5, 5, &[(3, 1), (1, 1), (4, 0), (9, 9)]).unwrap();
        assert_eq!(mask.count_filled().unwrap(), 3);
        assert_eq!(
            mask.filled_points().unwrap(),
            vec![(4, 0), (1, 1), (3, 1)]
        );
        assert_eq!(mask.topmost_filled().unwrap(), Some((4, 0)));
    }

    #[test]
    fn test_logical_and_unions_filled() {
        let a = Pix::mask_from_points(4, 4, &[(0, 0), (1, 1)]).unwrap();
        let b = Pix::mask_from_points(4, 4, &[(1, 1), (3, 3)]).unwrap();
        let c = a.logical_and(&b).unwrap();
        assert_eq!(c.filled_points().unwrap(), vec![(0, 0), (1, 1), (3, 3)]);
    }

    #[test]
    fn test_logical_and_size_mismatch() {
        let a = Pix::new_mask(4, 4).unwrap();
        let b = Pix::new_mask(5, 4).unwrap();
        assert!(a.logical_and(&b).is_err());
    }

    #[test]
    fn test_set_masked_8bpp() {
        let mask = Pix::mask_from_points(4, 3, &[(1, 1), (2, 2)]).unwrap();
        let mut pm = Pix::new(4, 3, PixelDepth::Bit8).unwrap().into_mut();
        pm.set_all_arbitrary(100);
        pm.set_masked(&mask, 7).unwrap();
        assert_eq!(pm.get_pixel(1, 1), Some(7));
        assert_eq!(pm.get_pixel(2, 2), Some(7));
        assert_eq!(pm.get_pixel(0, 0), Some(100));
    }

    #[test]
    fn test_combine_masked() {
        let mask = Pix::mask_from_points(3, 3, &[(0, 2)]).unwrap();
        let mut src = Pix::new(3, 3, PixelDepth::Bit8).unwrap().into_mut();
        src.set_all_arbitrary(42);
        let src: Pix = src.into();
        let mut dst = Pix::new(3, 3, PixelDepth::Bit8).unwrap().into_mut();
        dst.combine_masked(&src, &mask).unwrap();
        assert_eq!(dst.get_pixel(0, 2), Some(42));
        assert_eq!(dst.get_pixel(1, 2), Some(0));

        let gray_mask = Pix::new(3, 3, PixelDepth::Bit8).unwrap();
        assert!(dst.combine_masked(&src, &gray_mask).is_err());
    }
}
