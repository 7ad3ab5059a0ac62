use std::path::PathBuf;

/// Errors raised while loading a coverage report.
///
/// Any of these aborts the run before a single report section is printed.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Failed to read coverage report {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed coverage report at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Coverage report root is missing required attribute '{attribute}'")]
    MissingData { attribute: &'static str },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
