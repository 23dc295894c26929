use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BbsError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("camelot not found. Install it with: pip install \"camelot-py[base]\"")]
    CamelotNotFound,

    #[error("camelot failed with exit code {code}: {stderr}")]
    CamelotFailed { code: i32, stderr: String },

    #[error("invalid column mapping: {0}")]
    MappingInvalid(String),

    #[error("mapped source column '{0}' does not exist in the extracted table")]
    UnknownColumn(String),

    #[error("failed to load options from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("nothing to export: {0}")]
    NothingToExport(String),

    #[error("spreadsheet export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
