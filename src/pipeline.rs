use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::diagnostics::{CollectingSink, Diagnostic};
use crate::error::Result;
use crate::ingestion::{self, IngestionResult, LoadedAsset};
use crate::output;
use crate::translate::{Translation, Translator};

/// Summary of a completed pipeline run.
#[derive(Debug)]
pub struct ProcessingResult {
    pub material_count: usize,
    pub failed_count: usize,
    pub generated_count: usize,
    pub diagnostic_count: usize,
    pub duration: Duration,
}

/// Outcome of translating one material, with the diagnostics it produced.
#[derive(Debug)]
pub struct TranslatedMaterial {
    /// Index of the material in the source asset.
    pub index: usize,
    pub name: String,
    pub translation: Result<Translation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslatedMaterial {
    /// The translation, if it succeeded.
    pub fn translated(&self) -> Option<&Translation> {
        self.translation.as_ref().ok()
    }

    pub fn is_failed(&self) -> bool {
        self.translation.is_err()
    }
}

/// Pipeline orchestrator -- ingests an asset, translates every material and
/// writes the results.
pub struct Pipeline;

impl Pipeline {
    /// Run the full pipeline.
    pub fn run(config: &PipelineConfig) -> Result<ProcessingResult> {
        let start = Instant::now();

        info!(input = %config.input.display(), "Starting pipeline");

        info!("Stage 1/3: Ingestion");
        let ingestion_result = ingestion::ingest(config)?;

        info!("Stage 2/3: Translation");
        let translator = Translator::new(config.translator.clone());
        let materials = translate_all(&ingestion_result.asset, &translator);

        if config.json {
            println!("{}", serde_json::to_string_pretty(&output::build_report(&materials))?);
        } else {
            print_summary(&ingestion_result, &materials);
        }

        let failed_count = materials.iter().filter(|m| m.is_failed()).count();
        let generated_count = materials
            .iter()
            .filter_map(TranslatedMaterial::translated)
            .map(|t| t.auxiliary.len())
            .sum();
        let diagnostic_count = materials.iter().map(|m| m.diagnostics.len()).sum();

        if let Some(dir) = &config.output {
            info!("Stage 3/3: Output");
            output::write_outputs(dir, &materials)?;
        }

        let duration = start.elapsed();
        info!(
            materials = materials.len(),
            failed = failed_count,
            generated = generated_count,
            diagnostics = diagnostic_count,
            elapsed = ?duration,
            "Pipeline complete"
        );

        Ok(ProcessingResult {
            material_count: materials.len(),
            failed_count,
            generated_count,
            diagnostic_count,
            duration,
        })
    }
}

/// Translate every material of `asset` in parallel.
///
/// Each material gets its own sink; its diagnostics are replayed to
/// `tracing` and kept on the result. A failed material is logged and kept
/// with its error; the others are unaffected.
pub fn translate_all(asset: &LoadedAsset, translator: &Translator) -> Vec<TranslatedMaterial> {
    asset
        .materials
        .par_iter()
        .enumerate()
        .map(|(index, material)| {
            let mut sink = CollectingSink::new();
            let translation =
                translator.translate(material, &asset.textures, &asset.images, &mut sink);
            sink.log_all(&material.name);
            if let Err(e) = &translation {
                error!(index, material = %material.name, %e, "Material translation failed");
            }
            TranslatedMaterial {
                index,
                name: material.name.clone(),
                translation,
                diagnostics: sink.into_items(),
            }
        })
        .collect()
}

/// Print a human-readable summary of the translated materials.
fn print_summary(ingestion: &IngestionResult, materials: &[TranslatedMaterial]) {
    let stats = &ingestion.stats;
    println!("=== Input ===");
    println!("  Format:     {}", stats.input_format);
    println!("  Materials:  {}", stats.material_count);
    println!("  Spec-gloss: {}", stats.spec_gloss_count);
    println!("  Textures:   {}", stats.texture_count);
    println!("  Images:     {} ({} px)", stats.image_count, stats.total_pixels);
    println!();
    println!("=== Materials ===");
    for m in materials {
        let name = if m.name.is_empty() { "<unnamed>" } else { m.name.as_str() };
        let translation = match &m.translation {
            Ok(t) => t,
            Err(e) => {
                println!("  #{:<3} {:<24} FAILED: {e}", m.index, name);
                continue;
            }
        };
        let params = &translation.params;
        let keywords: Vec<String> = params.keywords().map(|k| format!("{k:?}")).collect();
        println!(
            "  #{:<3} {:<24} {:?} / {}",
            m.index,
            name,
            params.shading_model,
            params.render_state.bucket.render_type()
        );
        println!("       slots: {}", params.slots().count());
        if !keywords.is_empty() {
            println!("       keywords: {}", keywords.join(", "));
        }
        for aux in &translation.auxiliary {
            println!("       generated: {} ({:?})", aux.name, aux.mode);
        }
        for d in &m.diagnostics {
            println!("       {:?}: {}", d.level, d.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogCode;
    use crate::error::BridgeError;
    use crate::types::{DecodedImage, Material, PbrMetallicRoughness, Texture, TextureInfo};
    use image::RgbaImage;

    fn asset() -> LoadedAsset {
        LoadedAsset {
            materials: vec![
                Material {
                    name: "a".into(),
                    pbr_metallic_roughness: Some(PbrMetallicRoughness {
                        metallic_roughness_texture: Some(TextureInfo::new(0)),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                Material {
                    name: "b".into(),
                    normal_texture: Some(TextureInfo::new(7)),
                    double_sided: true,
                    ..Default::default()
                },
            ],
            textures: vec![Texture::new(0)],
            images: vec![DecodedImage::new(RgbaImage::new(4, 4))],
        }
    }

    #[test]
    fn translate_all_keeps_order_and_diagnostics() {
        let results = translate_all(&asset(), &Translator::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].index, 0);
        assert_eq!(results[0].name, "a");
        let a = results[0].translated().unwrap();
        assert_eq!(a.params.name, "a");
        assert_eq!(a.auxiliary.len(), 1);
        assert!(results[0].diagnostics.is_empty());

        assert_eq!(results[1].translated().unwrap().params.name, "b");
        let codes: Vec<LogCode> = results[1].diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![LogCode::TextureNotFound, LogCode::DoubleSidedUnsupported]
        );
    }

    #[test]
    fn failed_material_does_not_drop_the_others() {
        let mut asset = asset();
        asset.materials.push(Material {
            name: "c".into(),
            occlusion_texture: Some(TextureInfo::new(1)),
            ..Default::default()
        });
        asset.textures.push(Texture::new(1));
        asset.images.push(DecodedImage::new(RgbaImage::new(0, 0)));

        let results = translate_all(&asset, &Translator::default());
        assert_eq!(results.len(), 3);
        assert!(!results[0].is_failed());
        assert_eq!(results[0].translated().unwrap().auxiliary.len(), 1);
        assert!(!results[1].is_failed());

        assert_eq!(results[2].name, "c");
        assert!(matches!(
            results[2].translation,
            Err(BridgeError::EmptyImage {
                width: 0,
                height: 0
            })
        ));
    }
}
