//! Error types shared by the layout engine and both export backends.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a single export attempt.
///
/// Layout-stage problems (bad template key, bad input) are kept apart from
/// [`ExportError`], which only the serialization backends and the final save
/// step produce.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),
    #[error("unknown entry category `{0}`")]
    UnknownCategory(String),
    #[error("template `{0}` requires an upgrade")]
    TemplateLocked(String),
    #[error("invalid resume data: {0}")]
    InvalidInput(#[from] serde_json::Error),
    #[error("failed to parse font: {0}")]
    Font(String),
    #[error("reading '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Failures raised while serializing or saving an already laid-out document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF serialization error: {0}")]
    Pdf(String),
    #[error("document serialization error: {0}")]
    Document(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ForgeError> = std::result::Result<T, E>;
