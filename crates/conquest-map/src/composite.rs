//! Region highlighting
//!
//! Overlays a color onto a base image through the combination of one or
//! more region masks. Combining uses the same bitwise AND as a merge, so
//! the highlighted area is every pixel filled in at least one of the
//! masks. Nothing here touches the registry or the mask files.

use crate::error::MapResult;
use conquest_core::{Color, Pix};
use conquest_region::mask_path;
use std::path::Path;

/// Read the mask of region `key` from `masks_dir` as a 1 bpp mask.
///
/// Hand-painted masks of other depths are thresholded.
pub fn load_mask(masks_dir: &Path, key: u32) -> MapResult<Pix> {
    let pix = conquest_io::read_image(mask_path(masks_dir, key))?;
    Ok(pix.to_mask()?)
}

/// Combine masks with a bitwise AND.
///
/// Returns `None` when `masks` is empty.
pub fn combine_masks(masks: &[Pix]) -> MapResult<Option<Pix>> {
    let Some((first, rest)) = masks.split_first() else {
        return Ok(None);
    };
    let mut combined = first.to_mask()?;
    for mask in rest {
        combined = combined.logical_and(&mask.to_mask()?)?;
    }
    Ok(Some(combined))
}

/// Paint `color` onto an RGB copy of `im` wherever the combined `masks`
/// are filled.
///
/// Returns `None` when `masks` is empty.
pub fn composite_masks(im: &Pix, masks: &[Pix], color: Color) -> MapResult<Option<Pix>> {
    let Some(combined) = combine_masks(masks)? else {
        return Ok(None);
    };
    let mut out = im.to_rgb()?.into_mut();
    out.set_masked(&combined, color.to_pixel32())?;
    Ok(Some(out.into()))
}

/// Highlight the regions `keys` of `im` in `color`, reading their masks
/// from `masks_dir`.
///
/// Returns `None` when `keys` is empty.
pub fn composite_regions(
    im: &Pix,
    keys: &[u32],
    color: Color,
    masks_dir: &Path,
) -> MapResult<Option<Pix>> {
    let masks = keys
        .iter()
        .map(|&key| load_mask(masks_dir, key))
        .collect::<MapResult<Vec<_>>>()?;
    composite_masks(im, &masks, color)
}
