//! Region label overlays
//!
//! Three 8 bpp images, the size of the base map, carry each region's
//! label drawn at its centroid:
//!
//! - `numbers.png`: black glyphs on white
//! - `numbers_background.png`: black label boxes on white, used as a
//!   composite mask
//! - `numbers2.png`: black label boxes with white glyphs, used as the
//!   composite source
//!
//! Labels are rendered with a fixed 8x8 bitmap font from `font8x8`.

use crate::error::{RegionError, RegionResult};
use crate::region::Region;
use conquest_core::{Color, Pix, PixMut, PixelDepth};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the glyph overlay
pub const NUMBERS_FILE: &str = "numbers.png";
/// File name of the label-box overlay
pub const NUMBERS_BACKGROUND_FILE: &str = "numbers_background.png";
/// File name of the boxed, inverted glyph overlay
pub const NUMBERS_INVERSE_FILE: &str = "numbers2.png";

/// Glyph side length of the bitmap font, in font pixels
const GLYPH_SIZE: u32 = 8;

/// Glyph table of the bitmap font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphSet {
    /// ASCII
    #[default]
    Basic,
    /// Latin-1 supplement, with ASCII as fallback
    Latin,
}

/// Font used to draw region labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelFont {
    /// Glyph table
    pub glyphs: GlyphSet,
    /// Integer magnification of each font pixel
    pub scale: u32,
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            glyphs: GlyphSet::Basic,
            scale: 1,
        }
    }
}

impl LabelFont {
    /// Create a font with the given glyph table at scale 1
    pub fn new(glyphs: GlyphSet) -> Self {
        Self { glyphs, scale: 1 }
    }

    /// Set the magnification (clamped to at least 1)
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    fn glyph(&self, ch: char) -> Option<[u8; 8]> {
        let found = match self.glyphs {
            GlyphSet::Basic => BASIC_FONTS.get(ch),
            GlyphSet::Latin => LATIN_FONTS.get(ch).or_else(|| BASIC_FONTS.get(ch)),
        };
        found.or_else(|| BASIC_FONTS.get('?'))
    }

    /// Size in pixels of `text` rendered on one line.
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        let cell = GLYPH_SIZE * self.scale.max(1);
        (text.chars().count() as u32 * cell, cell)
    }

    /// Draw `text` with its top-left corner at `(x, y)`; pixels outside
    /// the image are clipped.
    pub fn draw(&self, pix: &mut PixMut, x: i32, y: i32, text: &str, val: u32) {
        let scale = self.scale.max(1) as i32;
        let (w, h) = (pix.width() as i32, pix.height() as i32);
        let mut cursor_x = x;
        for ch in text.chars() {
            if let Some(glyph) = self.glyph(ch) {
                for (row_idx, row) in glyph.iter().enumerate() {
                    for col_idx in 0..GLYPH_SIZE as i32 {
                        if (row >> col_idx) & 1 == 0 {
                            continue;
                        }
                        let px = cursor_x + col_idx * scale;
                        let py = y + row_idx as i32 * scale;
                        for ty in py.max(0)..(py + scale).min(h) {
                            for tx in px.max(0)..(px + scale).min(w) {
                                pix.set_pixel_unchecked(tx as u32, ty as u32, val);
                            }
                        }
                    }
                }
            }
            cursor_x += GLYPH_SIZE as i32 * scale;
        }
    }
}

/// Options for label rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOptions {
    /// Font override; `None` uses the built-in font at scale 1
    pub font: Option<LabelFont>,
}

impl LabelOptions {
    /// Use a specific font
    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    /// The font labels are drawn with
    pub fn font(&self) -> LabelFont {
        self.font.unwrap_or_default()
    }
}

/// The three rendered label overlays
#[derive(Debug, Clone)]
pub struct LabelOverlays {
    /// Black glyphs on white
    pub numbers: Pix,
    /// Black label boxes on white
    pub background: Pix,
    /// Black label boxes with white glyphs
    pub numbers_inverse: Pix,
}

impl LabelOverlays {
    /// Save the overlays into `dir` under their standard file names.
    pub fn save(&self, dir: &Path) -> RegionResult<()> {
        conquest_io::write_image(&self.numbers, dir.join(NUMBERS_FILE))?;
        conquest_io::write_image(&self.background, dir.join(NUMBERS_BACKGROUND_FILE))?;
        conquest_io::write_image(&self.numbers_inverse, dir.join(NUMBERS_INVERSE_FILE))?;
        Ok(())
    }
}

/// Render the label overlays for `regions` on a `width` x `height` map.
///
/// Each label is centered on its region's centroid. The label box is the
/// text bounds padded by one pixel. Regions are drawn in key order, so a
/// later box can cover an earlier label.
pub fn render_labels(
    width: u32,
    height: u32,
    regions: &BTreeMap<u32, Region>,
    options: &LabelOptions,
) -> RegionResult<LabelOverlays> {
    let font = options.font();
    let white = Color::WHITE.to_pixel(PixelDepth::Bit8);
    let black = Color::BLACK.to_pixel(PixelDepth::Bit8);

    let blank = || -> RegionResult<PixMut> {
        let mut pm = Pix::new(width, height, PixelDepth::Bit8)?.into_mut();
        pm.set_all_arbitrary(white);
        Ok(pm)
    };
    let mut numbers = blank()?;
    let mut background = blank()?;
    let mut numbers_inverse = blank()?;

    for (&key, region) in regions {
        let text = region.label(key);
        let (tw, th) = font.text_size(&text);
        let (cx, cy) = region.center;
        let x = (cx - tw as f64 / 2.0).round() as i32;
        let y = (cy - th as f64 / 2.0).round() as i32;

        background.fill_rect(x - 1, y - 1, tw + 2, th + 2, black);
        numbers_inverse.fill_rect(x - 1, y - 1, tw + 2, th + 2, black);
        font.draw(&mut numbers_inverse, x, y, &text, white);
        font.draw(&mut numbers, x, y, &text, black);
    }

    Ok(LabelOverlays {
        numbers: numbers.into(),
        background: background.into(),
        numbers_inverse: numbers_inverse.into(),
    })
}

/// Render and save the label overlays for the map in `filepath`.
///
/// The overlay size is taken from the base image `filepath/filename`.
///
/// # Errors
///
/// Returns [`RegionError::MissingResource`] if the base image does not
/// exist.
pub fn create_number_mask(
    regions: &BTreeMap<u32, Region>,
    filepath: &Path,
    filename: &str,
    options: &LabelOptions,
) -> RegionResult<LabelOverlays> {
    let base_path = filepath.join(filename);
    if !base_path.exists() {
        return Err(RegionError::MissingResource { path: base_path });
    }
    let base = conquest_io::read_image(&base_path)?;
    let overlays = render_labels(base.width(), base.height(), regions, options)?;
    overlays.save(filepath)?;
    tracing::debug!(
        dir = %filepath.display(),
        labels = regions.len(),
        "label overlays written"
    );
    Ok(overlays)
}
