use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostics::Diagnostic;
use crate::error::{BridgeError, Result};
use crate::pipeline::TranslatedMaterial;
use crate::translate::RepackMode;
use crate::types::MaterialParameterSet;

/// File name of the JSON report inside the output directory.
pub const REPORT_FILE: &str = "materials.json";

/// One generated image as listed in the report.
#[derive(Debug, Serialize)]
pub struct GeneratedEntry {
    pub name: String,
    pub mode: RepackMode,
    pub source: usize,
    pub file: String,
}

/// Report entry for one material. Failed materials carry `error` and no
/// `params`.
#[derive(Debug, Serialize)]
pub struct MaterialReport<'a> {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<&'a MaterialParameterSet>,
    pub generated: Vec<GeneratedEntry>,
    pub diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build report entries for translated materials.
pub fn build_report(materials: &[TranslatedMaterial]) -> Vec<MaterialReport<'_>> {
    materials
        .iter()
        .map(|m| MaterialReport {
            index: m.index,
            params: m.translated().map(|t| &t.params),
            generated: m
                .translated()
                .into_iter()
                .flat_map(|t| &t.auxiliary)
                .map(|aux| GeneratedEntry {
                    name: aux.name.clone(),
                    mode: aux.mode,
                    source: aux.source,
                    file: image_file_name(m.index, &aux.name),
                })
                .collect(),
            diagnostics: &m.diagnostics,
            error: m.translation.as_ref().err().map(ToString::to_string),
        })
        .collect()
}

/// Write every generated image as PNG plus the JSON report to `dir`.
///
/// Returns the number of images written.
pub fn write_outputs(dir: &Path, materials: &[TranslatedMaterial]) -> Result<usize> {
    fs::create_dir_all(dir)?;

    let mut written = 0;
    for m in materials {
        let Some(translation) = m.translated() else {
            continue;
        };
        for aux in &translation.auxiliary {
            let path = dir.join(image_file_name(m.index, &aux.name));
            aux.pixels.save(&path).map_err(|e| {
                BridgeError::Output(format!("Failed to write {}: {e}", path.display()))
            })?;
            debug!(path = %path.display(), "Wrote generated texture");
            written += 1;
        }
    }

    let report_path = dir.join(REPORT_FILE);
    let writer = BufWriter::new(File::create(&report_path)?);
    serde_json::to_writer_pretty(writer, &build_report(materials))?;

    info!(images = written, report = %report_path.display(), "Wrote outputs");
    Ok(written)
}

/// `m<index>_<name>.png`, with anything but ASCII alphanumerics, `-` and `_`
/// replaced.
fn image_file_name(material_index: usize, name: &str) -> String {
    let clean: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("m{material_index:03}_{clean}.png")
}
