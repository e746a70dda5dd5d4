use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying a comparison table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("required column '{0}' is missing from the comparison table")]
    MissingColumn(String),

    #[error("sample column '{0}' not found in the comparison table")]
    UnknownSample(String),

    #[error("column '{0}' cannot be used as a sample column")]
    InvalidSampleColumn(String),

    #[error("column '{0}' appears more than once in the comparison table")]
    DuplicateColumn(String),

    #[error("sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        sheet: String,
        path: PathBuf,
        available: String,
    },

    #[error("the comparison table is empty")]
    Empty,

    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Newick syntax error, `position` is the byte offset in the input.
#[derive(Debug, Error)]
pub enum NewickError {
    #[error("invalid Newick string at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NewickError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        NewickError::Syntax {
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot infer output format from '{0}' (expected .svg, .nwk, .newick, .tree or .json)")]
    UnsupportedFormat(String),

    #[error("cannot write output to {path}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
