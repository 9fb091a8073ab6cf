//! # GlassFlow Domain
//!
//! Configuration model and error taxonomy for the GlassFlow ClickHouse ETL
//! SDK.
//!
//! This crate contains:
//! - Pipeline configuration types (source, join, sink, deduplication)
//! - Cross-field validation performed at construction time
//! - The client-visible error taxonomy
//!
//! ## Architecture
//! - Pure data and validation, no I/O
//! - Only external dependencies allowed

pub mod errors;
pub mod models;

// Re-export commonly used items
pub use errors::{ConfigValidationError, EtlError, Result};
pub use models::{JoinConfig, PipelineConfig, SinkConfig, SourceConfig};
