//! Single-pipeline resource client

use glassflow_domain::errors::ConfigValidationError;
use glassflow_domain::{EtlError, PipelineConfig};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::info;

use crate::dlq::Dlq;
use crate::options::ClientOptions;
use crate::tracking::Tracking;
use crate::transport::Transport;

/// Collection endpoint all pipeline operations hang off.
pub(crate) const PIPELINE_ENDPOINT: &str = "/api/v1/pipeline";

/// Handle to one pipeline on the remote service.
///
/// Holds either a full configuration (pre-creation or hydrated via
/// [`Pipeline::get`]) or just a pipeline id. Constructing a handle has no
/// remote effect; only the lifecycle methods talk to the service. The handle
/// owns a [`Dlq`] client scoped to the same pipeline and host.
#[derive(Debug)]
pub struct Pipeline {
    transport: Transport,
    tracking: Tracking,
    pipeline_id: String,
    config: Option<PipelineConfig>,
    dlq: Dlq,
}

impl Pipeline {
    /// Handle carrying a full configuration; the id is taken from it.
    pub fn with_config(
        options: &ClientOptions,
        config: PipelineConfig,
    ) -> Result<Self, EtlError> {
        let transport = options.build_transport()?;
        Ok(Self::attached(
            transport,
            options.tracking.clone(),
            config.pipeline_id.clone(),
            Some(config),
        ))
    }

    /// Reference-only handle for an existing pipeline id.
    pub fn from_id(
        options: &ClientOptions,
        pipeline_id: impl Into<String>,
    ) -> Result<Self, EtlError> {
        let transport = options.build_transport()?;
        Ok(Self::attached(transport, options.tracking.clone(), pipeline_id.into(), None))
    }

    pub(crate) fn attached(
        transport: Transport,
        tracking: Tracking,
        pipeline_id: String,
        config: Option<PipelineConfig>,
    ) -> Self {
        let dlq = Dlq::attached(transport.clone(), pipeline_id.clone());
        Self { transport, tracking, pipeline_id, config, dlq }
    }

    /// Id of the pipeline this handle refers to.
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Configuration, if provided at construction or hydrated via `get`.
    pub fn config(&self) -> Option<&PipelineConfig> {
        self.config.as_ref()
    }

    /// DLQ client scoped to this pipeline.
    pub fn dlq(&self) -> &Dlq {
        &self.dlq
    }

    /// Deploy this pipeline on the service.
    ///
    /// # Errors
    ///
    /// `PipelineAlreadyExists` when a pipeline with the same id is active
    /// (403), `InvalidPipelineConfig` when the service rejects the config
    /// (422), `Validation` on a malformed request (400), `InternalServer`
    /// otherwise. Requires a configuration, which is checked before any
    /// request is issued.
    pub async fn create(&self) -> Result<(), EtlError> {
        let Some(config) = &self.config else {
            let err = EtlError::Config(ConfigValidationError::new(
                "config",
                "pipeline configuration must be provided at construction",
            ));
            self.track_error("PipelineCreateError", &err);
            return Err(err);
        };

        let body = config.to_wire();
        let id = self.pipeline_id.clone();
        let outcome = self
            .transport
            .request(Method::POST, PIPELINE_ENDPOINT, Some(&body), move |status, text| {
                match status {
                    StatusCode::FORBIDDEN => Some(EtlError::PipelineAlreadyExists(id.clone())),
                    StatusCode::UNPROCESSABLE_ENTITY => {
                        Some(EtlError::InvalidPipelineConfig(text.to_string()))
                    }
                    StatusCode::BAD_REQUEST => Some(EtlError::Validation(text.to_string())),
                    _ => None,
                }
            })
            .await;

        match outcome {
            Ok(_) => {
                info!(pipeline_id = %self.pipeline_id, "pipeline deployed");
                self.track("PipelineDeployed");
                Ok(())
            }
            Err(err) => {
                self.track_error("PipelineCreateError", &err);
                Err(err)
            }
        }
    }

    /// Fetch the pipeline by id and hydrate the local configuration.
    ///
    /// # Errors
    ///
    /// `PipelineNotFound` on 404.
    pub async fn get(&mut self) -> Result<&PipelineConfig, EtlError> {
        let path = format!("{PIPELINE_ENDPOINT}/{}", self.pipeline_id);
        let id = self.pipeline_id.clone();
        let outcome = self
            .transport
            .request(Method::GET, &path, None, move |status, _| {
                (status == StatusCode::NOT_FOUND)
                    .then(|| EtlError::PipelineNotFound(id.clone()))
            })
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                self.track_error("PipelineGetError", &err);
                return Err(err);
            }
        };

        let value: Value = response.json().await.map_err(|err| {
            EtlError::InternalServer(format!("failed to decode pipeline response: {err}"))
        })?;
        let config = PipelineConfig::from_value(value)?;
        Ok(self.config.insert(config))
    }

    /// Delete the pipeline.
    ///
    /// A reference-only handle resolves remote state via [`Pipeline::get`]
    /// first, so deleting an unknown id reports not-found consistently.
    pub async fn delete(&mut self) -> Result<(), EtlError> {
        if self.config.is_none() {
            self.get().await?;
        }

        let path = format!("{PIPELINE_ENDPOINT}/{}", self.pipeline_id);
        let id = self.pipeline_id.clone();
        let outcome = self
            .transport
            .request(Method::DELETE, &path, None, move |status, _| {
                (status == StatusCode::NOT_FOUND)
                    .then(|| EtlError::PipelineNotFound(id.clone()))
            })
            .await;

        match outcome {
            Ok(_) => {
                info!(pipeline_id = %self.pipeline_id, "pipeline deleted");
                self.track("PipelineDeleted");
                Ok(())
            }
            Err(err) => {
                self.track_error("PipelineDeleteError", &err);
                Err(err)
            }
        }
    }

    /// Pause the pipeline. Idempotency is whatever the service reports.
    pub async fn pause(&self) -> Result<(), EtlError> {
        self.lifecycle("pause", "PipelinePaused", "PipelinePauseError").await
    }

    /// Resume a paused pipeline.
    pub async fn resume(&self) -> Result<(), EtlError> {
        self.lifecycle("resume", "PipelineResumed", "PipelineResumeError").await
    }

    async fn lifecycle(
        &self,
        action: &str,
        success_event: &str,
        error_event: &str,
    ) -> Result<(), EtlError> {
        let path = format!("{PIPELINE_ENDPOINT}/{}/{action}", self.pipeline_id);
        let id = self.pipeline_id.clone();
        let outcome = self
            .transport
            .request(Method::POST, &path, None, move |status, _| {
                (status == StatusCode::NOT_FOUND)
                    .then(|| EtlError::PipelineNotFound(id.clone()))
            })
            .await;

        match outcome {
            Ok(_) => {
                info!(pipeline_id = %self.pipeline_id, action, "pipeline lifecycle transition");
                self.track(success_event);
                Ok(())
            }
            Err(err) => {
                self.track_error(error_event, &err);
                Err(err)
            }
        }
    }

    /// Local wire-shape serialization of the current state.
    ///
    /// Falls back to a minimal `{"pipeline_id": ...}` object when no
    /// configuration is hydrated.
    pub fn to_value(&self) -> Value {
        match &self.config {
            Some(config) => config.to_wire(),
            None => json!({ "pipeline_id": self.pipeline_id }),
        }
    }

    /// Validate an untyped configuration mapping locally. Never issues a
    /// network call.
    pub fn validate_config(config: &Value) -> Result<(), ConfigValidationError> {
        PipelineConfig::from_value(config.clone()).map(|_| ())
    }

    fn tracking_info(&self) -> Value {
        let Some(config) = &self.config else {
            return json!({ "pipeline_id": self.pipeline_id });
        };

        let join_enabled = config.join.as_ref().is_some_and(|join| join.enabled);
        let dedup_enabled = config
            .source
            .topics
            .iter()
            .find_map(|topic| topic.deduplication.as_ref())
            .is_some_and(|dedup| dedup.enabled);
        let params = &config.source.connection_params;

        json!({
            "pipeline_id": config.pipeline_id,
            "join_enabled": join_enabled,
            "deduplication_enabled": dedup_enabled,
            "source_auth_method": params.mechanism.as_str(),
            "source_security_protocol": params.protocol.as_str(),
            "source_root_ca_provided": params.root_ca.is_some(),
            "source_skip_auth": params.skip_auth,
        })
    }

    fn track(&self, event: &str) {
        self.tracking.emit(event, self.tracking_info());
    }

    fn track_error(&self, event: &str, err: &EtlError) {
        let mut props = self.tracking_info();
        if let Some(object) = props.as_object_mut() {
            object.insert("error_type".to_string(), json!(err.error_type()));
        }
        self.tracking.emit(event, props);
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use glassflow_domain::PipelineConfig;
    use serde_json::{json, Value};

    /// Wire-shape JSON for a small valid pipeline.
    pub fn sample_config_value() -> Value {
        json!({
            "pipeline_id": "test-pipeline",
            "source": {
                "type": "kafka",
                "connection_params": {
                    "brokers": ["kafka:9092"],
                    "protocol": "SASL_SSL",
                    "mechanism": "SCRAM-SHA-256",
                    "username": "user",
                    "password": "pass",
                    "root_ca": "----CERT----",
                    "skip_auth": false
                },
                "topics": [{
                    "name": "orders",
                    "consumer_group_initial_offset": "earliest",
                    "schema": {
                        "type": "json",
                        "fields": [
                            {"name": "id", "type": "string"},
                            {"name": "amount", "type": "int32"}
                        ]
                    },
                    "deduplication": {
                        "enabled": true,
                        "id_field": "id",
                        "id_field_type": "string",
                        "time_window": "1h"
                    }
                }]
            },
            "sink": {
                "type": "clickhouse",
                "host": "clickhouse.local",
                "port": 8443,
                "database": "analytics",
                "username": "etl",
                "password": "secret",
                "secure": true,
                "table": "orders",
                "table_mapping": [{
                    "source_id": "orders",
                    "field_name": "id",
                    "column_name": "order_id",
                    "column_type": "String"
                }]
            }
        })
    }

    pub fn sample_config() -> PipelineConfig {
        PipelineConfig::from_value(sample_config_value()).unwrap()
    }
}
