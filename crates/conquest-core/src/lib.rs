//! Conquest Core - Pixel grid primitives for map segmentation
//!
//! This crate provides the data structures shared by every other crate of
//! the conquest map engine:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`PixelDepth`] - Supported bit depths (1, 2, 4, 8, 16, 32 bpp)
//! - [`Color`] - RGB color used for highlights and overlays
//! - Region masks: 1 bpp images where a `0` pixel marks membership
//!
//! # Mask convention
//!
//! Region masks are stored exactly as they are persisted: a filled pixel
//! (member of the region) has value [`MASK_FILLED`] and renders black, every
//! other pixel has value [`MASK_UNFILLED`] and renders white.

pub mod error;
pub mod pix;

pub use error::{Error, Result};
pub use pix::{Color, ImageFormat, MASK_FILLED, MASK_UNFILLED, Pix, PixMut, PixelDepth};

/// Color channel helpers for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 255)
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Extract RGBA values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// ITU-R 601-2 luma transform, rounded to nearest.
    ///
    /// Uses 16-bit fixed-point weights (`19595`, `38470`, `7471`, summing to
    /// 65536), matching the gray levels PIL produces for `convert("L")`.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
    }

    /// Difference between two pixel values.
    ///
    /// For 32-bit pixels this is the sum of the absolute per-channel
    /// differences over R, G and B; for every other depth it is the
    /// absolute difference of the raw values.
    pub fn color_diff(depth: crate::PixelDepth, a: u32, b: u32) -> u32 {
        match depth {
            crate::PixelDepth::Bit32 => {
                let (r1, g1, b1) = extract_rgb(a);
                let (r2, g2, b2) = extract_rgb(b);
                (r1 as i32 - r2 as i32).unsigned_abs()
                    + (g1 as i32 - g2 as i32).unsigned_abs()
                    + (b1 as i32 - b2 as i32).unsigned_abs()
            }
            _ => a.abs_diff(b),
        }
    }

}
