//! PNG image format support
//!
//! Masks are written as 1-bit grayscale, scan grids and label overlays as
//! 8-bit grayscale and rendered maps as 8-bit RGB. Indexed images are
//! expanded to 32 bpp on read.

use crate::{IoError, IoResult};
use conquest_core::{ImageFormat, Pix, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read one sub-byte (or byte) sample from a packed PNG row.
#[inline]
fn packed_sample(row: &[u8], x: u32, bits: u32) -> u32 {
    let per_byte = 8 / bits;
    let byte = row[(x / per_byte) as usize] as u32;
    let shift = 8 - bits * (x % per_byte + 1);
    (byte >> shift) & ((1 << bits) - 1)
}

fn bits_of(bit_depth: BitDepth) -> u32 {
    match bit_depth {
        BitDepth::One => 1,
        BitDepth::Two => 2,
        BitDepth::Four => 4,
        BitDepth::Eight => 8,
        BitDepth::Sixteen => 16,
    }
}

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;
    let palette: Option<Vec<u8>> = info.palette.as_ref().map(|p| p.to_vec());

    let (pix_depth, spp) = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::One) => (PixelDepth::Bit1, 1),
        (ColorType::Grayscale, BitDepth::Two) => (PixelDepth::Bit2, 1),
        (ColorType::Grayscale, BitDepth::Four) => (PixelDepth::Bit4, 1),
        (ColorType::Grayscale, BitDepth::Eight) => (PixelDepth::Bit8, 1),
        (ColorType::Grayscale, BitDepth::Sixteen) => (PixelDepth::Bit16, 1),
        (ColorType::GrayscaleAlpha, _) => (PixelDepth::Bit32, 4),
        (ColorType::Rgb, _) => (PixelDepth::Bit32, 3),
        (ColorType::Rgba, _) => (PixelDepth::Bit32, 4),
        (ColorType::Indexed, _) => (PixelDepth::Bit32, 3),
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut pix_mut = Pix::new(width, height, pix_depth)?.into_mut();
    pix_mut.set_spp(spp);
    pix_mut.set_informat(ImageFormat::Png);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let wide = bit_depth == BitDepth::Sixteen;

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let xi = x as usize;
            let val = match color_type {
                ColorType::Grayscale if wide => {
                    ((row[xi * 2] as u32) << 8) | (row[xi * 2 + 1] as u32)
                }
                ColorType::Grayscale => packed_sample(row, x, bits_of(bit_depth)),
                ColorType::Indexed => {
                    let index = packed_sample(row, x, bits_of(bit_depth)) as usize;
                    let entry = palette
                        .as_deref()
                        .and_then(|p| p.get(index * 3..index * 3 + 3))
                        .ok_or_else(|| {
                            IoError::InvalidData(format!("palette index {} out of range", index))
                        })?;
                    color::compose_rgb(entry[0], entry[1], entry[2])
                }
                ColorType::GrayscaleAlpha => {
                    let step = if wide { 2 } else { 1 };
                    let idx = xi * 2 * step;
                    let (g, a) = (row[idx], row[idx + step]);
                    color::compose_rgba(g, g, g, a)
                }
                ColorType::Rgb => {
                    let step = if wide { 2 } else { 1 };
                    let idx = xi * 3 * step;
                    color::compose_rgb(row[idx], row[idx + step], row[idx + 2 * step])
                }
                ColorType::Rgba => {
                    let step = if wide { 2 } else { 1 };
                    let idx = xi * 4 * step;
                    color::compose_rgba(
                        row[idx],
                        row[idx + step],
                        row[idx + 2 * step],
                        row[idx + 3 * step],
                    )
                }
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, bit_depth) = match pix.depth() {
        PixelDepth::Bit1 => (ColorType::Grayscale, BitDepth::One),
        PixelDepth::Bit2 => (ColorType::Grayscale, BitDepth::Two),
        PixelDepth::Bit4 => (ColorType::Grayscale, BitDepth::Four),
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight),
        PixelDepth::Bit16 => (ColorType::Grayscale, BitDepth::Sixteen),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight),
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let bytes_per_row = match color_type {
        ColorType::Rgb => width as usize * 3,
        ColorType::Rgba => width as usize * 4,
        _ => (width as usize * bits_of(bit_depth) as usize).div_ceil(8),
    };

    let mut data = vec![0u8; bytes_per_row * height as usize];

    for y in 0..height {
        let row = &mut data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            let xi = x as usize;
            match (color_type, bit_depth) {
                (ColorType::Rgb, _) => {
                    let (r, g, b) = color::extract_rgb(val);
                    row[xi * 3..xi * 3 + 3].copy_from_slice(&[r, g, b]);
                }
                (ColorType::Rgba, _) => {
                    let (r, g, b, a) = color::extract_rgba(val);
                    row[xi * 4..xi * 4 + 4].copy_from_slice(&[r, g, b, a]);
                }
                (_, BitDepth::Sixteen) => {
                    row[xi * 2] = (val >> 8) as u8;
                    row[xi * 2 + 1] = val as u8;
                }
                (_, depth) => {
                    let bits = bits_of(depth);
                    let per_byte = 8 / bits;
                    let shift = 8 - bits * (x % per_byte + 1);
                    row[(x / per_byte) as usize] |= ((val & ((1 << bits) - 1)) as u8) << shift;
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
