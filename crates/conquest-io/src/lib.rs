//! Conquest I/O - Reading and writing map images
//!
//! Every artifact the engine persists (region masks, label overlays,
//! blank map copies) is written as PNG through the `png` crate. Input
//! maps may be in any common raster format; non-PNG input is decoded
//! with the `image` crate and converted to a [`Pix`].

pub mod error;
pub mod format;
pub mod png;

pub use conquest_core::ImageFormat;
pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use crate::png::{read_png, write_png};

use conquest_core::{Pix, PixelDepth, color};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file path.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be opened and a decode error
/// if the contents are not a supported image.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    tracing::trace!(path = %path.display(), ?format, "reading image");
    match format {
        ImageFormat::Png => read_png(BufReader::new(File::open(path)?)),
        _ => read_image_mem(&std::fs::read(path)?),
    }
}

/// Read an image from an in-memory buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    if format == ImageFormat::Png {
        return read_png(Cursor::new(data));
    }
    let decoded =
        image::load_from_memory(data).map_err(|e| IoError::DecodeError(e.to_string()))?;
    let mut pix = from_dynamic(&decoded)?.into_mut();
    pix.set_informat(format);
    Ok(pix.into())
}

/// Convert a decoded `image` buffer into a `Pix`.
///
/// Grayscale sources become 8 bpp; everything else becomes 32 bpp RGB,
/// keeping alpha when the source has it.
fn from_dynamic(img: &image::DynamicImage) -> IoResult<Pix> {
    let (w, h) = (img.width(), img.height());
    let color_type = img.color();
    if !color_type.has_color() && !color_type.has_alpha() {
        let gray = img.to_luma8();
        let mut pm = Pix::new(w, h, PixelDepth::Bit8)?.into_mut();
        for (x, y, p) in gray.enumerate_pixels() {
            pm.set_pixel_unchecked(x, y, p.0[0] as u32);
        }
        return Ok(pm.into());
    }
    let rgba = img.to_rgba8();
    let mut pm = Pix::new(w, h, PixelDepth::Bit32)?.into_mut();
    if color_type.has_alpha() {
        pm.set_spp(4);
    }
    for (x, y, p) in rgba.enumerate_pixels() {
        let [r, g, b, a] = p.0;
        pm.set_pixel_unchecked(x, y, color::compose_rgba(r, g, b, a));
    }
    Ok(pm.into())
}

/// Write an image to a file path as PNG.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    let path = path.as_ref();
    tracing::trace!(path = %path.display(), depth = pix.depth().bits(), "writing image");
    let mut writer = BufWriter::new(File::create(path)?);
    write_png(pix, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image as PNG bytes.
pub fn encode_png(pix: &Pix) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(pix, &mut buf)?;
    Ok(buf)
}
