//! Error types used throughout the SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a DLQ batch size is rejected before any request is made.
pub const INVALID_BATCH_SIZE_MESSAGE: &str = "batch_size must be an integer between 1 and 1000";

/// Construction-time configuration failure, carrying the offending field path.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid pipeline configuration at `{field}`: {reason}")]
pub struct ConfigValidationError {
    /// Path of the field that failed validation (e.g. `join.sources`)
    pub field: String,
    /// Human-readable reason for the failure
    pub reason: String,
}

impl ConfigValidationError {
    /// Create a validation error for the given field path.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

/// Main error type for GlassFlow ETL operations
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to connect to GlassFlow ETL service: {0}")]
    Connection(String),

    #[error("Pipeline with id '{0}' not found")]
    PipelineNotFound(String),

    #[error("Pipeline with id '{0}' already exists; delete it first or use a different pipeline id")]
    PipelineAlreadyExists(String),

    #[error("Invalid pipeline configuration: {0}")]
    InvalidPipelineConfig(String),

    #[error("Bad request: {0}")]
    Validation(String),

    #[error("API request failed: {0}")]
    InternalServer(String),

    #[error("{0}")]
    InvalidBatchSize(String),

    #[error(transparent)]
    Config(#[from] ConfigValidationError),
}

impl EtlError {
    /// Locally rejected DLQ batch size, with the fixed pre-flight message.
    pub fn invalid_batch_size() -> Self {
        Self::InvalidBatchSize(INVALID_BATCH_SIZE_MESSAGE.to_string())
    }

    /// Short name reported as the `error_type` telemetry property.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Connection(_) => "ConnectionError",
            Self::PipelineNotFound(_) => "PipelineNotFound",
            Self::PipelineAlreadyExists(_) => "PipelineAlreadyExists",
            Self::InvalidPipelineConfig(_) => "InvalidPipelineConfig",
            Self::Validation(_) => "BadRequest",
            Self::InternalServer(_) => "InternalServerError",
            Self::InvalidBatchSize(_) => "InvalidBatchSize",
            Self::Config(_) => "InvalidConfig",
        }
    }
}

/// Result type alias for GlassFlow ETL operations
pub type Result<T> = std::result::Result<T, EtlError>;
