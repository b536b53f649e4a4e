use std::fs;
use std::path::Path;

use gltf::image::Format;
use image::RgbaImage;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::ingestion::LoadedAsset;
use crate::types::{DecodedImage, Material, Texture};

const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Root of the glTF JSON, reduced to the material table.
#[derive(Deserialize)]
struct MaterialTable {
    #[serde(default)]
    materials: Vec<Material>,
}

/// Load a glTF or GLB file into material, texture and image tables.
///
/// Materials are read from the document JSON directly so that absent
/// `pbrMetallicRoughness` blocks stay absent.
pub fn load_gltf(path: &Path) -> Result<LoadedAsset> {
    let (document, _buffers, image_data) = gltf::import(path)
        .map_err(|e| BridgeError::Input(format!("Failed to load glTF: {e}")))?;

    let materials = parse_materials(&fs::read(path)?)?;
    if materials.len() != document.materials().len() {
        return Err(BridgeError::Input(format!(
            "Material table mismatch: {} parsed, {} in document",
            materials.len(),
            document.materials().len()
        )));
    }

    debug!(
        materials = materials.len(),
        textures = document.textures().len(),
        images = image_data.len(),
        "Loaded glTF document"
    );

    let textures = document
        .textures()
        .map(|t| Texture {
            source: t.source().index() as i32,
            name: t.name().map(str::to_owned),
        })
        .collect();

    let images = document
        .images()
        .zip(&image_data)
        .map(|(image, data)| -> Result<DecodedImage> {
            let pixels = convert_gltf_image(data)?;
            Ok(DecodedImage {
                name: image.name().map(str::to_owned),
                pixels,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedAsset {
        materials,
        textures,
        images,
    })
}

/// Parse the material table from glTF JSON or a GLB container.
fn parse_materials(bytes: &[u8]) -> Result<Vec<Material>> {
    let table: MaterialTable = if bytes.starts_with(GLB_MAGIC) {
        let glb = gltf::Glb::from_slice(bytes)
            .map_err(|e| BridgeError::Input(format!("Failed to read GLB container: {e}")))?;
        serde_json::from_slice(&glb.json)?
    } else {
        serde_json::from_slice(bytes)?
    };
    Ok(table.materials)
}

/// Expand decoded glTF image data of any pixel format to RGBA8.
fn convert_gltf_image(data: &gltf::image::Data) -> Result<RgbaImage> {
    let (channels, bytes, sample): (usize, usize, fn(&[u8]) -> u8) = match data.format {
        Format::R8 => (1, 1, sample_u8),
        Format::R8G8 => (2, 1, sample_u8),
        Format::R8G8B8 => (3, 1, sample_u8),
        Format::R8G8B8A8 => (4, 1, sample_u8),
        Format::R16 => (1, 2, sample_u16),
        Format::R16G16 => (2, 2, sample_u16),
        Format::R16G16B16 => (3, 2, sample_u16),
        Format::R16G16B16A16 => (4, 2, sample_u16),
        Format::R32G32B32FLOAT => (3, 4, sample_f32),
        Format::R32G32B32A32FLOAT => (4, 4, sample_f32),
    };

    let pixel_count = data.width as usize * data.height as usize;
    let stride = channels * bytes;
    if data.pixels.len() != pixel_count * stride {
        return Err(BridgeError::Input(format!(
            "Image data length {} does not match {}x{} {:?}",
            data.pixels.len(),
            data.width,
            data.height,
            data.format
        )));
    }

    if data.format == Format::R8G8B8A8 {
        return RgbaImage::from_raw(data.width, data.height, data.pixels.clone())
            .ok_or_else(|| BridgeError::Input("Invalid RGBA8 image buffer".into()));
    }

    let mut rgba = Vec::with_capacity(pixel_count * 4);
    for px in data.pixels.chunks_exact(stride) {
        let c = |i: usize| sample(&px[i * bytes..(i + 1) * bytes]);
        let out = match channels {
            1 => [c(0), c(0), c(0), 255],
            2 => [c(0), c(1), 0, 255],
            3 => [c(0), c(1), c(2), 255],
            _ => [c(0), c(1), c(2), c(3)],
        };
        rgba.extend_from_slice(&out);
    }

    RgbaImage::from_raw(data.width, data.height, rgba)
        .ok_or_else(|| BridgeError::Input("Invalid image buffer".into()))
}

fn sample_u8(b: &[u8]) -> u8 {
    b[0]
}

fn sample_u16(b: &[u8]) -> u8 {
    (u16::from_ne_bytes([b[0], b[1]]) >> 8) as u8
}

fn sample_f32(b: &[u8]) -> u8 {
    let v = f32::from_ne_bytes([b[0], b[1], b[2], b[3]]);
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::types::AlphaMode;

    const SPEC_GLOSS_ONLY: &str = r#"{
        "asset": { "version": "2.0" },
        "materials": [
            {
                "name": "leaf",
                "extensions": {
                    "KHR_materials_pbrSpecularGlossiness": { "glossinessFactor": 0.6 }
                }
            },
            { "name": "plain", "alphaMode": "BLEND" }
        ]
    }"#;

    fn data(format: Format, pixels: Vec<u8>, width: u32, height: u32) -> gltf::image::Data {
        gltf::image::Data {
            pixels,
            format,
            width,
            height,
        }
    }

    #[test]
    fn rgba8_passes_through() {
        let img = convert_gltf_image(&data(
            Format::R8G8B8A8,
            vec![255, 0, 0, 255, 0, 255, 0, 128],
            2,
            1,
        ))
        .unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0), &image::Rgba([0, 255, 0, 128]));
    }

    #[test]
    fn rgb8_gets_opaque_alpha() {
        let img =
            convert_gltf_image(&data(Format::R8G8B8, vec![10, 20, 30, 40, 50, 60], 1, 2)).unwrap();
        assert_eq!(img.get_pixel(0, 1), &image::Rgba([40, 50, 60, 255]));
    }

    #[test]
    fn gray8_expands_to_rgb() {
        let img = convert_gltf_image(&data(Format::R8, vec![77], 1, 1)).unwrap();
        assert_eq!(img.get_pixel(0, 0), &image::Rgba([77, 77, 77, 255]));
    }

    #[test]
    fn rg8_has_zero_blue() {
        let img = convert_gltf_image(&data(Format::R8G8, vec![1, 2], 1, 1)).unwrap();
        assert_eq!(img.get_pixel(0, 0), &image::Rgba([1, 2, 0, 255]));
    }

    #[test]
    fn sixteen_bit_keeps_high_byte() {
        let mut pixels = Vec::new();
        for v in [0xABCDu16, 0x1234, 0xFFFF, 0x0000] {
            pixels.extend_from_slice(&v.to_ne_bytes());
        }
        let img = convert_gltf_image(&data(Format::R16G16B16A16, pixels, 1, 1)).unwrap();
        assert_eq!(img.get_pixel(0, 0), &image::Rgba([0xAB, 0x12, 0xFF, 0x00]));
    }

    #[test]
    fn float_is_clamped() {
        let mut pixels = Vec::new();
        for v in [0.5f32, 2.0, -1.0] {
            pixels.extend_from_slice(&v.to_ne_bytes());
        }
        let img = convert_gltf_image(&data(Format::R32G32B32FLOAT, pixels, 1, 1)).unwrap();
        assert_eq!(img.get_pixel(0, 0), &image::Rgba([128, 255, 0, 255]));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = convert_gltf_image(&data(Format::R8G8B8A8, vec![0; 7], 2, 1)).unwrap_err();
        assert!(matches!(err, BridgeError::Input(_)));
    }

    #[test]
    fn missing_pbr_block_stays_absent() {
        let materials = parse_materials(SPEC_GLOSS_ONLY.as_bytes()).unwrap();
        assert_eq!(materials.len(), 2);
        assert!(materials[0].pbr_metallic_roughness.is_none());
        let sg = materials[0].specular_glossiness().unwrap();
        assert!((sg.glossiness_factor - 0.6).abs() < 1e-6);
        assert_eq!(materials[1].alpha_mode, AlphaMode::Blend);
    }

    #[test]
    fn materials_read_from_glb_json_chunk() {
        let glb = gltf::Glb {
            header: gltf::binary::Header {
                magic: *GLB_MAGIC,
                version: 2,
                length: 0,
            },
            json: Cow::Borrowed(SPEC_GLOSS_ONLY.as_bytes()),
            bin: None,
        };
        let bytes = glb.to_vec().unwrap();

        let materials = parse_materials(&bytes).unwrap();
        assert_eq!(materials[0].name, "leaf");
        assert!(materials[0].pbr_metallic_roughness.is_none());
        assert!(materials[0].specular_glossiness().is_some());
    }

    #[test]
    fn no_material_table_is_empty() {
        let materials = parse_materials(br#"{ "asset": { "version": "2.0" } }"#).unwrap();
        assert!(materials.is_empty());
    }

    #[test]
    fn truncated_glb_is_rejected() {
        let err = parse_materials(b"glTF\x02\x00\x00\x00").unwrap_err();
        assert!(matches!(err, BridgeError::Input(_)));
    }
}
