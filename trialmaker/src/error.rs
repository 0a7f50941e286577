//! Error types for reading stimulus files and building trials.
//!
//! - [`CsvError`] - Reading and parsing the stimulus file
//! - [`TrialError`] - Looking up attributes or trials
//! - [`AppError`] - Top-level errors surfaced by the CLI
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading a stimulus file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The stimulus file does not exist.
    #[error("Stimulus file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded with the requested encoding.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Malformed tabular structure.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Empty file (no header row).
    #[error("CSV file is empty")]
    EmptyFile,
}

impl CsvError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        CsvError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Map an IO error on `path`, keeping "not found" distinguishable.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CsvError::NotFound { path: path.into() },
            _ => CsvError::Io(err),
        }
    }
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => CsvError::Io(e),
            csv::ErrorKind::Utf8 { err, .. } => CsvError::Encoding(err.to_string()),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => CsvError::parse(
                line,
                format!("Expected {} fields in line {}, saw {}", expected_len, line, len),
            ),
            other => CsvError::parse(line, format!("{:?}", other)),
        }
    }
}

// =============================================================================
// Trial Errors
// =============================================================================

/// Errors when consuming trials.
#[derive(Debug, Error)]
pub enum TrialError {
    /// No attribute with that name was assigned.
    #[error("Trial has no attribute '{0}'")]
    MissingAttribute(String),

    /// Trial index past the end of the list.
    #[error("Trial index {index} out of range (list has {len} trials)")]
    Index { index: usize, len: usize },
}

// =============================================================================
// Application Errors (top-level)
// =============================================================================

/// Top-level errors returned by the CLI commands.
#[derive(Debug, Error)]
pub enum AppError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Trial lookup error.
    #[error("Trial error: {0}")]
    Trial(#[from] TrialError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad command-line value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for trial lookups.
pub type TrialResult<T> = Result<T, TrialError>;

/// Result type for CLI operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let app_err: AppError = csv_err.into();
        assert!(app_err.to_string().contains("empty"));

        let trial_err = TrialError::MissingAttribute("target".into());
        let app_err: AppError = trial_err.into();
        assert!(app_err.to_string().contains("target"));
    }

    #[test]
    fn test_not_found_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CsvError::from_io("stims.csv", io);
        assert!(matches!(err, CsvError::NotFound { .. }));
        assert!(err.to_string().contains("stims.csv"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(CsvError::from_io("stims.csv", io), CsvError::Io(_)));
    }

    #[test]
    fn test_parse_error_format() {
        let err = CsvError::parse(4, "Expected 3 fields in line 4, saw 5");
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("saw 5"));
    }
}
