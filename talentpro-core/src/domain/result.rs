//! Error types and the JSON operation envelope

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::import::ImportError;

/// Core library error type
///
/// Store adapters report through this type; services work in
/// `anyhow::Result` and callers can downcast back to it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable code for JSON output
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::Import(ImportError::HeaderNotFound { .. }) => "header_not_found",
            Self::Import(ImportError::NoDataRows { .. }) => "no_data_rows",
            Self::Import(ImportError::InvalidDivisor { .. }) => "invalid_divisor",
            Self::Import(ImportError::EncodingMismatch { .. }) => "encoding_mismatch",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }

    /// Best-effort code for an error chain that may wrap a core error
    pub fn code_of(err: &anyhow::Error) -> &'static str {
        if let Some(core) = err.downcast_ref::<Error>() {
            return core.code();
        }
        match err.downcast_ref::<ImportError>() {
            Some(import) => Error::Import(import.clone()).code(),
            None => "other",
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Envelope for `--json` output that has to report failures on stdout too
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Failure from an error chain; `context` gains its `code`
    pub fn from_error(err: &anyhow::Error, mut context: HashMap<String, serde_json::Value>) -> Self {
        context.insert("code".to_string(), Error::code_of(err).into());
        Self {
            context: Some(context),
            ..Self::fail(format!("{:#}", err))
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}
