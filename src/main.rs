use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use gltf_material_bridge::config::{CliArgs, PipelineConfig};
use gltf_material_bridge::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing on stderr so --json output stays clean
    let filter = if args.verbose {
        EnvFilter::new("gltf_material_bridge=debug")
    } else {
        EnvFilter::new("gltf_material_bridge=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config: PipelineConfig = args.into();

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    match Pipeline::run(&config) {
        Ok(result) => {
            eprintln!(
                "Done: {} materials ({} failed), {} generated textures, {} diagnostics in {:.2}s",
                result.material_count,
                result.failed_count,
                result.generated_count,
                result.diagnostic_count,
                result.duration.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            error!(%e, "Pipeline failed");
            Err(anyhow::anyhow!(e)).context("gltf-material-bridge pipeline failed")
        }
    }
}
