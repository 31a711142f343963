//! Error taxonomy for risk assessment operations.
//!
//! Errors are split by how the orchestrator reacts to them:
//!
//! - `NotFound`: the referenced entity is absent. The entity is skipped and
//!   the failure recorded.
//! - `Validation`: a value is outside its allowed range. The write is
//!   rejected and the prior record state is left untouched.
//! - `TransientStore`: an I/O failure in the store. Retried once before it
//!   is recorded.
//! - `Conflict`: an optimistic concurrency check failed. The whole
//!   read-modify-write is retried.
//! - `Enumeration`: the target entity set could not be listed. Fatal.
//!
//! # Error Codes
//!
//! - E001-E009: store and I/O errors
//! - E010-E019: validation errors
//! - E020-E029: configuration errors
//! - E030-E039: run errors
//!
//! # Example
//!
//! ```rust
//! use chainrisk::errors::RiskError;
//! use chainrisk::core::{EntityRef, SupplierId};
//!
//! let err = RiskError::not_found(EntityRef::Supplier(SupplierId(7)));
//! assert_eq!(err.code().as_str(), "E001");
//! assert!(!err.is_retryable());
//! ```

pub mod collection;
pub mod summary;

use crate::core::EntityRef;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub use collection::{EntityFailure, OperationType};
pub use summary::FailureSummary;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Referenced entity does not exist
    pub const NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// Store I/O failure that may succeed on retry
    pub const STORE_TRANSIENT: ErrorCode = ErrorCode("E002");
    /// Record version changed underneath a writer
    pub const STORE_CONFLICT: ErrorCode = ErrorCode("E003");
    /// Unique constraint violated
    pub const STORE_UNIQUE: ErrorCode = ErrorCode("E004");
    /// File or serialization failure
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Value out of range
    pub const VALIDATION_RANGE: ErrorCode = ErrorCode("E010");

    /// Invalid configuration value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");

    /// Entity set could not be enumerated
    pub const RUN_ENUMERATION: ErrorCode = ErrorCode("E030");
    /// Run deadline expired
    pub const RUN_TIMEOUT: ErrorCode = ErrorCode("E031");
    /// Notification delivery failed
    pub const RUN_DISPATCH: ErrorCode = ErrorCode("E032");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("{entity} not found")]
    NotFound { entity: EntityRef },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Transient store error: {0}")]
    TransientStore(String),

    #[error("Concurrent update of {entity}: expected version {expected}, found {found}")]
    Conflict {
        entity: EntityRef,
        expected: u64,
        found: u64,
    },

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Failed to enumerate {target}: {message}")]
    Enumeration { target: String, message: String },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Assessment deadline expired")]
    Timeout,

    #[error("Notification dispatch failed: {0}")]
    Dispatch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl RiskError {
    pub fn not_found(entity: impl Into<EntityRef>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Reject a value outside `[min, max]`.
    pub fn out_of_range(field: &str, value: i64, min: i64, max: i64) -> Self {
        Self::validation(
            field,
            format!("{} is outside the allowed range [{}, {}]", value, min, max),
        )
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientStore(message.into())
    }

    pub fn enumeration(target: impl Into<String>, source: &RiskError) -> Self {
        Self::Enumeration {
            target: target.into(),
            message: source.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } | Self::RecordNotFound(_) => ErrorCode::NOT_FOUND,
            Self::Validation { .. } => ErrorCode::VALIDATION_RANGE,
            Self::TransientStore(_) => ErrorCode::STORE_TRANSIENT,
            Self::Conflict { .. } => ErrorCode::STORE_CONFLICT,
            Self::UniqueViolation(_) => ErrorCode::STORE_UNIQUE,
            Self::Enumeration { .. } => ErrorCode::RUN_ENUMERATION,
            Self::Config { .. } => ErrorCode::CONFIG_INVALID,
            Self::Timeout => ErrorCode::RUN_TIMEOUT,
            Self::Dispatch(_) => ErrorCode::RUN_DISPATCH,
            Self::Io(_) | Self::Json(_) | Self::Csv(_) => ErrorCode::IO_GENERIC,
        }
    }

    /// Whether repeating the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStore(_) | Self::Conflict { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }

    /// Short machine-friendly name used when grouping failures.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::RecordNotFound(_) => "not_found",
            Self::Validation { .. } => "validation",
            Self::TransientStore(_) => "transient_store",
            Self::Conflict { .. } => "conflict",
            Self::UniqueViolation(_) => "unique_violation",
            Self::Enumeration { .. } => "enumeration",
            Self::Config { .. } => "config",
            Self::Timeout => "timeout",
            Self::Dispatch(_) => "dispatch",
            Self::Io(_) | Self::Json(_) | Self::Csv(_) => "io",
        }
    }
}

pub type Result<T, E = RiskError> = std::result::Result<T, E>;
