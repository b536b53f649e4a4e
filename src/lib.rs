pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ingestion;
pub mod output;
pub mod pipeline;
pub mod translate;
pub mod types;

pub use config::{PipelineConfig, TranslatorConfig};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticsSink, LogCode};
pub use pipeline::Pipeline;
pub use translate::{Translation, Translator, translate};
