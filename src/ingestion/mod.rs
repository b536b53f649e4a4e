pub mod gltf_loader;

use std::path::Path;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{BridgeError, Result};
use crate::types::{DecodedImage, Material, Texture};

/// Material, texture and image tables of one asset.
#[derive(Debug, Clone, Default)]
pub struct LoadedAsset {
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<DecodedImage>,
}

/// Result of the ingestion stage.
#[derive(Debug)]
pub struct IngestionResult {
    pub asset: LoadedAsset,
    pub stats: IngestionStats,
}

/// Statistics about the ingested data.
#[derive(Debug)]
pub struct IngestionStats {
    pub material_count: usize,
    pub texture_count: usize,
    pub image_count: usize,
    pub total_pixels: u64,
    pub spec_gloss_count: usize,
    pub input_format: String,
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Gltf,
    Glb,
}

impl InputFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "gltf" => Ok(InputFormat::Gltf),
            "glb" => Ok(InputFormat::Glb),
            _ => Err(BridgeError::Input(format!(
                "Unsupported file format: .{ext}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Gltf => "glTF",
            InputFormat::Glb => "GLB",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the full ingestion stage.
pub fn ingest(config: &PipelineConfig) -> Result<IngestionResult> {
    if !config.input.exists() {
        return Err(BridgeError::Input(format!(
            "Input file not found: {}",
            config.input.display()
        )));
    }

    let format = InputFormat::from_path(&config.input)?;
    info!(format = %format, path = %config.input.display(), "Detected input format");

    let asset = gltf_loader::load_gltf(&config.input)?;

    let stats = compute_stats(&asset, format);
    debug!(
        materials = stats.material_count,
        textures = stats.texture_count,
        images = stats.image_count,
        pixels = stats.total_pixels,
        "Ingestion stats"
    );

    Ok(IngestionResult { asset, stats })
}

/// Compute summary statistics from loaded tables.
fn compute_stats(asset: &LoadedAsset, format: InputFormat) -> IngestionStats {
    let total_pixels = asset
        .images
        .iter()
        .map(|img| {
            let (w, h) = img.dimensions();
            w as u64 * h as u64
        })
        .sum();

    IngestionStats {
        material_count: asset.materials.len(),
        texture_count: asset.textures.len(),
        image_count: asset.images.len(),
        total_pixels,
        spec_gloss_count: asset
            .materials
            .iter()
            .filter(|m| m.specular_glossiness().is_some())
            .count(),
        input_format: format.as_str().to_string(),
    }
}
