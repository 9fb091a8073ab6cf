//! Dead letter queue client

use glassflow_domain::EtlError;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::options::ClientOptions;
use crate::transport::Transport;

/// Batch size used by [`Dlq::consume_default`].
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Largest batch the service will hand out in one call.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Read-only client for a pipeline's dead letter queue.
///
/// Events that fail processing land in the DLQ; consuming them removes them
/// from the queue. Usually obtained via [`crate::Pipeline::dlq`], but can be
/// built standalone for a known pipeline id.
#[derive(Debug, Clone)]
pub struct Dlq {
    transport: Transport,
    pipeline_id: String,
}

impl Dlq {
    /// Standalone DLQ client for the given pipeline id.
    pub fn new(
        options: &ClientOptions,
        pipeline_id: impl Into<String>,
    ) -> Result<Self, EtlError> {
        Ok(Self::attached(options.build_transport()?, pipeline_id.into()))
    }

    pub(crate) fn attached(transport: Transport, pipeline_id: String) -> Self {
        Self { transport, pipeline_id }
    }

    /// Id of the pipeline this queue belongs to.
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Current queue state (depth, oldest event timestamps and the like, as
    /// reported by the service).
    pub async fn state(&self) -> Result<Value, EtlError> {
        let path = self.endpoint("state");
        let response = self.request(Method::GET, &path).await?;
        response.json().await.map_err(|err| {
            EtlError::InternalServer(format!("failed to decode DLQ state: {err}"))
        })
    }

    /// Consume up to `batch_size` events from the queue.
    ///
    /// # Errors
    ///
    /// `InvalidBatchSize` when `batch_size` is outside `1..=1000`; the bound
    /// is checked locally and no request is issued. A 422 from the service is
    /// also reported as `InvalidBatchSize`, carrying the response body.
    pub async fn consume(&self, batch_size: usize) -> Result<Vec<Value>, EtlError> {
        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(EtlError::invalid_batch_size());
        }

        let path = format!("{}?batch_size={batch_size}", self.endpoint("consume"));
        let response = self.request(Method::GET, &path).await?;
        let events: Vec<Value> = response.json().await.map_err(|err| {
            EtlError::InternalServer(format!("failed to decode DLQ batch: {err}"))
        })?;
        debug!(pipeline_id = %self.pipeline_id, count = events.len(), "consumed DLQ events");
        Ok(events)
    }

    /// Consume with the default batch size of 100.
    pub async fn consume_default(&self) -> Result<Vec<Value>, EtlError> {
        self.consume(DEFAULT_BATCH_SIZE).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::Response, EtlError> {
        let id = self.pipeline_id.clone();
        self.transport
            .request(method, path, None, move |status, text| match status {
                StatusCode::NOT_FOUND => Some(EtlError::PipelineNotFound(id.clone())),
                StatusCode::UNPROCESSABLE_ENTITY => {
                    Some(EtlError::InvalidBatchSize(format!("API error: {text}")))
                }
                _ => None,
            })
            .await
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("/api/v1/pipeline/{}/dlq/{suffix}", self.pipeline_id)
    }
}
