use image::RgbaImage;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::DEFAULT_PARALLEL_THRESHOLD;
use crate::error::{BridgeError, Result};

/// Channel layout conversion applied to a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepackMode {
    /// Roughness (G) to grayscale RGB, smoothness `255 - G` in alpha.
    MetallicSmoothness,
    /// Occlusion (R) copied to G and B, alpha forced opaque.
    Occlusion,
}

impl RepackMode {
    /// Suffix appended to the source name of a generated image.
    pub fn suffix(self) -> &'static str {
        match self {
            RepackMode::MetallicSmoothness => "metal_smooth",
            RepackMode::Occlusion => "occlusion",
        }
    }

    #[inline]
    fn remap(self, px: &mut [u8]) {
        match self {
            RepackMode::MetallicSmoothness => {
                let g = px[1];
                px[0] = g;
                px[2] = g;
                px[3] = 255 - g;
            }
            RepackMode::Occlusion => {
                let r = px[0];
                px[1] = r;
                px[2] = r;
                px[3] = 255;
            }
        }
    }
}

/// Repack `source` into a new image using the default parallel threshold.
pub fn repack(source: &RgbaImage, mode: RepackMode) -> Result<RgbaImage> {
    repack_with_threshold(source, mode, DEFAULT_PARALLEL_THRESHOLD)
}

/// Repack `source` into a new image of the same size.
///
/// Images with at least `parallel_threshold` pixels are processed row-wise on
/// the rayon pool. The result does not depend on which path runs.
pub fn repack_with_threshold(
    source: &RgbaImage,
    mode: RepackMode,
    parallel_threshold: usize,
) -> Result<RgbaImage> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(BridgeError::EmptyImage { width, height });
    }

    let pixel_count = width as usize * height as usize;
    let parallel = pixel_count >= parallel_threshold;
    info!(?mode, width, height, parallel, "Converting texture channels (slow operation)");

    let mut out = source.clone();
    let buf: &mut [u8] = &mut out;
    let row_len = width as usize * 4;

    if parallel {
        buf.par_chunks_mut(row_len)
            .for_each(|row| row.chunks_exact_mut(4).for_each(|px| mode.remap(px)));
    } else {
        buf.chunks_exact_mut(4).for_each(|px| mode.remap(px));
    }

    Ok(out)
}
