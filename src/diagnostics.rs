//! Caller-visible diagnostics emitted during translation.
//!
//! Translation never fails on missing optional data. Instead every miss or
//! unsupported feature is reported through a [`DiagnosticsSink`] under a
//! stable [`LogCode`], so callers can assert on or replay them.

use serde::Serialize;
use tracing::{error, warn};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Error,
    Warning,
}

/// Stable diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCode {
    ImageNotFound,
    TextureNotFound,
    DoubleSidedUnsupported,
}

impl LogCode {
    pub fn level(self) -> Level {
        match self {
            LogCode::ImageNotFound | LogCode::TextureNotFound => Level::Error,
            LogCode::DoubleSidedUnsupported => Level::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogCode::ImageNotFound => "image not found",
            LogCode::TextureNotFound => "texture not found",
            LogCode::DoubleSidedUnsupported => "double-sided unsupported",
        }
    }
}

impl std::fmt::Display for LogCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub code: LogCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: LogCode, message: impl Into<String>) -> Self {
        Self {
            level: code.level(),
            code,
            message: message.into(),
        }
    }
}

/// Receiver for translation diagnostics.
pub trait DiagnosticsSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that keeps every diagnostic for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    items: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of diagnostics carrying `code`.
    pub fn count(&self, code: LogCode) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Forward everything collected so far to `tracing`.
    pub fn log_all(&self, material: &str) {
        let mut sink = TracingSink::for_material(material);
        for item in &self.items {
            sink.report(item.clone());
        }
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}

/// Sink that forwards straight to `tracing` at the matching level.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    material: String,
}

impl TracingSink {
    pub fn for_material(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
        }
    }
}

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error => error!(
                material = %self.material,
                code = %diagnostic.code,
                "{}",
                diagnostic.message
            ),
            Level::Warning => warn!(
                material = %self.material,
                code = %diagnostic.code,
                "{}",
                diagnostic.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_levels() {
        assert_eq!(LogCode::ImageNotFound.level(), Level::Error);
        assert_eq!(LogCode::TextureNotFound.level(), Level::Error);
        assert_eq!(LogCode::DoubleSidedUnsupported.level(), Level::Warning);
    }

    #[test]
    fn code_display() {
        assert_eq!(LogCode::ImageNotFound.to_string(), "image not found");
        assert_eq!(LogCode::TextureNotFound.to_string(), "texture not found");
        assert_eq!(
            LogCode::DoubleSidedUnsupported.to_string(),
            "double-sided unsupported"
        );
    }

    #[test]
    fn collecting_sink_counts_by_code() {
        let mut sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.report(Diagnostic::new(LogCode::TextureNotFound, "Texture #4 not found"));
        sink.report(Diagnostic::new(LogCode::TextureNotFound, "Texture #5 not found"));
        sink.report(Diagnostic::new(
            LogCode::DoubleSidedUnsupported,
            "Double sided shading is not supported",
        ));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.count(LogCode::TextureNotFound), 2);
        assert_eq!(sink.count(LogCode::ImageNotFound), 0);
        assert_eq!(sink.items()[2].level, Level::Warning);

        // Replaying must not consume the items
        sink.log_all("test");
        assert_eq!(sink.into_items().len(), 3);
    }
}
