use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LpsnError {
    #[error("LPSN request failed: {0}")]
    LpsnHttp(String),

    #[error("LPSN returned status {status}: {message}")]
    LpsnStatus { status: u16, message: String },

    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("column {column} missing from {path}")]
    #[diagnostic(help("the input table must carry a genus column named {column}"))]
    MissingColumn { column: String, path: PathBuf },

    #[error("invalid registry file {path}: {message}")]
    InvalidRegistry { path: PathBuf, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl LpsnError {
    pub fn is_network(&self) -> bool {
        matches!(self, LpsnError::LpsnHttp(_) | LpsnError::LpsnStatus { .. })
    }
}
