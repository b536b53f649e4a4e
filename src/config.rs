use std::path::PathBuf;

use clap::Parser;

use crate::types::UvTransform;

/// Images with at least this many pixels are repacked on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256 * 256;

/// Material translation parameters.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Flip V in the main texture transform.
    pub flip_v: bool,
    /// Attach a clamp wrap hint to the metallic-roughness base color map.
    pub clamp_base_color: bool,
    /// Minimum pixel count for parallel repacking.
    pub parallel_threshold: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            flip_v: true,
            clamp_base_color: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl TranslatorConfig {
    pub fn uv_transform(&self) -> UvTransform {
        if self.flip_v {
            UvTransform::FLIP_V
        } else {
            UvTransform::IDENTITY
        }
    }
}

/// Fully resolved pipeline configuration (constructed from CLI args).
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    /// Where generated images and the JSON report go, if anywhere.
    pub output: Option<PathBuf>,
    pub translator: TranslatorConfig,
    pub json: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "gltf-material-bridge",
    about = "Translate glTF materials into shader-ready parameter sets",
    version
)]
pub struct CliArgs {
    /// Input file (glTF or GLB)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output directory for repacked textures and the material report
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Print translated materials as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep glTF UV orientation (no V flip)
    #[arg(long)]
    pub no_flip_v: bool,

    /// Do not clamp the base color texture
    #[arg(long)]
    pub no_clamp: bool,

    /// Minimum pixel count for parallel channel repacking
    #[arg(long, default_value_t = DEFAULT_PARALLEL_THRESHOLD)]
    pub parallel_threshold: usize,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for PipelineConfig {
    fn from(args: CliArgs) -> Self {
        PipelineConfig {
            input: args.input,
            output: args.output,
            translator: TranslatorConfig {
                flip_v: !args.no_flip_v,
                clamp_base_color: !args.no_clamp,
                parallel_threshold: args.parallel_threshold,
            },
            json: args.json,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_translator_config() {
        let tc = TranslatorConfig::default();
        assert!(tc.flip_v);
        assert!(tc.clamp_base_color);
        assert_eq!(tc.parallel_threshold, 65_536);
        assert_eq!(tc.uv_transform(), UvTransform::FLIP_V);
    }

    #[test]
    fn uv_transform_without_flip() {
        let tc = TranslatorConfig {
            flip_v: false,
            ..Default::default()
        };
        assert_eq!(tc.uv_transform(), UvTransform::IDENTITY);
    }

    #[test]
    fn cli_args_to_pipeline_config() {
        let args = CliArgs::parse_from([
            "gltf-material-bridge",
            "-i",
            "model.glb",
            "-o",
            "./out",
            "--json",
            "--no-flip-v",
            "--no-clamp",
            "--parallel-threshold",
            "1024",
            "-v",
            "-j",
            "4",
        ]);

        let config: PipelineConfig = args.into();

        assert_eq!(config.input, PathBuf::from("model.glb"));
        assert_eq!(config.output, Some(PathBuf::from("./out")));
        assert!(config.json);
        assert!(!config.translator.flip_v);
        assert!(!config.translator.clamp_base_color);
        assert_eq!(config.translator.parallel_threshold, 1024);
        assert!(config.verbose);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn cli_args_minimal() {
        let args = CliArgs::parse_from(["gltf-material-bridge", "-i", "scene.gltf"]);
        let config: PipelineConfig = args.into();

        assert_eq!(config.input, PathBuf::from("scene.gltf"));
        assert_eq!(config.output, None);
        assert!(!config.json);
        assert!(config.translator.flip_v);
        assert!(config.translator.clamp_base_color);
        assert_eq!(
            config.translator.parallel_threshold,
            DEFAULT_PARALLEL_THRESHOLD
        );
        assert!(!config.verbose);
        assert_eq!(config.threads, None);
    }
}
