//! Error types for quicklist
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (rejected input, unknown task, malformed import file)
//! - 3: Conflict (import would collide with an existing task id)
//! - 4: Operation failed (database, filesystem, codec)

use thiserror::Error;

/// Exit codes for the quicklist CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const CONFLICT: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for quicklist operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    NotFound(i64),

    #[error("Malformed import payload: {0}")]
    Format(String),

    #[error("Import schema mismatch: {0}")]
    Schema(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Conflicts (exit code 3)
    #[error("Task id {0} already exists")]
    Conflict(i64),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_)
            | Error::NotFound(_)
            | Error::Format(_)
            | Error::Schema(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::Conflict(_) => exit_codes::CONFLICT,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::Sqlite(_)
            | Error::Csv(_)
            | Error::XlsxWrite(_)
            | Error::XlsxRead(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Machine-readable error kind used in the JSON error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::Format(_) => "format",
            Error::Schema(_) => "schema",
            Error::Conflict(_) => "conflict",
            Error::InvalidConfig(_) | Error::InvalidArgument(_) => "user_error",
            _ => "operation_failed",
        }
    }

    /// Structured details for the JSON error envelope, when the error has any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotFound(id) | Error::Conflict(id) => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }
}

/// Result type alias for quicklist operations
pub type Result<T> = std::result::Result<T, Error>;
