//! # GlassFlow Client
//!
//! Client for the GlassFlow ClickHouse ETL control plane.
//!
//! This crate contains:
//! - The HTTP transport shared by all clients
//! - [`Pipeline`]: create/get/delete/pause/resume one pipeline
//! - [`PipelineManager`]: list/create/get/delete across pipelines
//! - [`Dlq`]: drain a pipeline's dead-letter queue
//! - Fire-and-forget usage telemetry, injected as a capability
//!
//! ## Architecture
//! - Control requests only; the remote service executes the pipelines
//! - One outbound request per call, no implicit retries
//! - Thread safety delegated to reqwest's pooled client
//!
//! ```no_run
//! use glassflow_client::{ClientOptions, PipelineManager};
//!
//! # async fn demo(config: glassflow_client::PipelineConfig) -> glassflow_client::Result<()> {
//! let manager = PipelineManager::with_options(&ClientOptions::new("http://localhost:8080"))?;
//! let pipeline = manager.create(config).await?;
//! pipeline.dlq().consume_default().await?;
//! # Ok(())
//! # }
//! ```

pub mod dlq;
pub mod manager;
pub mod options;
pub mod pipeline;
pub mod tracking;
pub mod transport;

// Re-export commonly used items
pub use dlq::Dlq;
pub use glassflow_domain::{
    ConfigValidationError, EtlError, PipelineConfig, Result,
};
pub use manager::PipelineManager;
pub use options::ClientOptions;
pub use pipeline::Pipeline;
pub use tracking::{MixpanelTracker, TrackEvents, Tracking};
pub use transport::{Transport, DEFAULT_URL};
