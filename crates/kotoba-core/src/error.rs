//! Error types and exit codes for kotoba
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (including partially failed imports)
//! - 2: Usage error (bad flags/args, unsupported values)
//! - 3: Data/store error (lifecycle misuse, invalid packages, duplicates)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the kotoba CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for KotobaError {
    fn from(err: rusqlite::Error) -> Self {
        KotobaError::Other(err.to_string())
    }
}

impl From<zip::result::ZipError> for KotobaError {
    fn from(err: zip::result::ZipError) -> Self {
        KotobaError::MalformedArchive(err.to_string())
    }
}

/// Errors that can occur during kotoba operations
#[derive(Error, Debug)]
pub enum KotobaError {
    // Store lifecycle misuse
    #[error("database not initialized")]
    NotInitialized,

    #[error("database already initialized")]
    AlreadyInitialized,

    // Import validation, fatal to the import attempt
    #[error("malformed dictionary archive: {0}")]
    MalformedArchive(String),

    #[error("no dictionary index found in archive")]
    MissingIndex,

    #[error("unrecognized dictionary format: {reason}")]
    InvalidIndex { reason: String },

    #[error("unsupported dictionary version: {version} (supported: {min}-{max})")]
    UnsupportedVersion { version: i64, min: i64, max: i64 },

    #[error("dictionary is already imported: {title}")]
    DuplicateDictionary { title: String },

    #[error("invalid bank {file}: {reason}")]
    InvalidBank { file: String, reason: String },

    /// Recoverable per-chunk failure during bulk insert
    #[error("failed to insert chunk {chunk} into {table}: {reason}")]
    ChunkInsertFailure {
        table: String,
        chunk: usize,
        reason: String,
    },

    // Store errors
    #[error("invalid store at {path:?}: {reason}")]
    InvalidStore { path: PathBuf, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Usage errors
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Generic failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl KotobaError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        KotobaError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        KotobaError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        KotobaError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_bank(file: &str, reason: impl std::fmt::Display) -> Self {
        KotobaError::InvalidBank {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            KotobaError::UsageError(_) | KotobaError::InvalidValue { .. } => ExitCode::Usage,

            KotobaError::NotInitialized
            | KotobaError::AlreadyInitialized
            | KotobaError::MalformedArchive(_)
            | KotobaError::MissingIndex
            | KotobaError::InvalidIndex { .. }
            | KotobaError::UnsupportedVersion { .. }
            | KotobaError::DuplicateDictionary { .. }
            | KotobaError::InvalidBank { .. }
            | KotobaError::InvalidStore { .. }
            | KotobaError::NotFound { .. } => ExitCode::Data,

            KotobaError::ChunkInsertFailure { .. }
            | KotobaError::Io(_)
            | KotobaError::Json(_)
            | KotobaError::Toml(_)
            | KotobaError::FailedOperation { .. }
            | KotobaError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            KotobaError::NotInitialized => "not_initialized",
            KotobaError::AlreadyInitialized => "already_initialized",
            KotobaError::MalformedArchive(_) => "malformed_archive",
            KotobaError::MissingIndex => "missing_index",
            KotobaError::InvalidIndex { .. } => "invalid_index",
            KotobaError::UnsupportedVersion { .. } => "unsupported_version",
            KotobaError::DuplicateDictionary { .. } => "duplicate_dictionary",
            KotobaError::InvalidBank { .. } => "invalid_bank",
            KotobaError::ChunkInsertFailure { .. } => "chunk_insert_failure",
            KotobaError::InvalidStore { .. } => "invalid_store",
            KotobaError::NotFound { .. } => "not_found",
            KotobaError::UsageError(_) => "usage_error",
            KotobaError::InvalidValue { .. } => "invalid_value",
            KotobaError::Io(_) => "io_error",
            KotobaError::Json(_) => "json_error",
            KotobaError::Toml(_) => "toml_error",
            KotobaError::FailedOperation { .. } => "failed_operation",
            KotobaError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for kotoba operations
pub type Result<T> = std::result::Result<T, KotobaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_data_errors() {
        assert_eq!(KotobaError::MissingIndex.exit_code(), ExitCode::Data);
        assert_eq!(
            KotobaError::DuplicateDictionary {
                title: "JMdict".to_string()
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(KotobaError::NotInitialized.exit_code(), ExitCode::Data);
    }

    #[test]
    fn test_to_json_envelope() {
        let err = KotobaError::UnsupportedVersion {
            version: 4,
            min: 1,
            max: 3,
        };
        let json = err.to_json();
        assert_eq!(json["error"]["type"], "unsupported_version");
        assert_eq!(json["error"]["code"], 3);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unsupported dictionary version: 4"));
    }

    #[test]
    fn test_zip_error_maps_to_malformed_archive() {
        let err: KotobaError = zip::result::ZipError::InvalidArchive("bad header".into()).into();
        assert!(matches!(err, KotobaError::MalformedArchive(_)));
    }
}
