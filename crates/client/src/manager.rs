//! Collection-level pipeline operations

use glassflow_domain::{EtlError, PipelineConfig};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::options::ClientOptions;
use crate::pipeline::{Pipeline, PIPELINE_ENDPOINT};
use crate::tracking::Tracking;
use crate::transport::Transport;

/// Entry point for collection-level operations against the ETL service.
///
/// Creates [`Pipeline`] handles sharing this manager's transport and
/// telemetry configuration. Cheap to construct; no connection is made until
/// an operation runs.
pub struct PipelineManager {
    transport: Transport,
    tracking: Tracking,
}

impl PipelineManager {
    /// Manager for the service at `url`, with telemetry from the
    /// environment.
    pub fn new(url: impl Into<String>) -> Result<Self, EtlError> {
        Self::with_options(&ClientOptions::new(url))
    }

    /// Manager with explicit options.
    pub fn with_options(options: &ClientOptions) -> Result<Self, EtlError> {
        let transport = options.build_transport()?;
        Ok(Self { transport, tracking: options.tracking.clone() })
    }

    /// List the ids of all pipelines known to the service.
    ///
    /// The list endpoint has drifted across server versions; bare arrays,
    /// `{"pipelines": [...]}` wrappers, and single-object responses are all
    /// accepted, with entries keyed by `id` or `pipeline_id`. A 404 means no
    /// pipelines exist and yields an empty list.
    pub async fn list(&self) -> Result<Vec<String>, EtlError> {
        let outcome = self
            .transport
            .request(Method::GET, PIPELINE_ENDPOINT, None, |status, _| {
                (status == StatusCode::NOT_FOUND)
                    .then(|| EtlError::PipelineNotFound(String::new()))
            })
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(EtlError::PipelineNotFound(_)) => return Ok(Vec::new()),
            Err(err) => {
                self.tracking.emit(
                    "PipelineListError",
                    serde_json::json!({ "error_type": err.error_type() }),
                );
                return Err(err);
            }
        };

        let value: Value = response.json().await.map_err(|err| {
            EtlError::InternalServer(format!("failed to decode pipeline list: {err}"))
        })?;
        let ids = pipeline_ids_from_response(&value);
        debug!(count = ids.len(), "listed pipelines");
        Ok(ids)
    }

    /// Deploy a new pipeline and return a handle to it.
    pub async fn create(&self, config: PipelineConfig) -> Result<Pipeline, EtlError> {
        config.validate()?;
        let pipeline = self.attach(config.pipeline_id.clone(), Some(config));
        pipeline.create().await?;
        Ok(pipeline)
    }

    /// Deploy a pipeline from an untyped configuration mapping.
    pub async fn create_from_value(&self, config: Value) -> Result<Pipeline, EtlError> {
        self.create(PipelineConfig::from_value(config)?).await
    }

    /// Fetch an existing pipeline by id, returning a hydrated handle.
    pub async fn get(&self, pipeline_id: impl Into<String>) -> Result<Pipeline, EtlError> {
        let mut pipeline = self.attach(pipeline_id.into(), None);
        pipeline.get().await?;
        Ok(pipeline)
    }

    /// Delete a pipeline by id.
    pub async fn delete(&self, pipeline_id: impl Into<String>) -> Result<(), EtlError> {
        let pipeline_id = pipeline_id.into();
        info!(pipeline_id = %pipeline_id, "deleting pipeline");
        let mut pipeline = self.attach(pipeline_id, None);
        pipeline.delete().await
    }

    fn attach(&self, pipeline_id: String, config: Option<PipelineConfig>) -> Pipeline {
        Pipeline::attached(self.transport.clone(), self.tracking.clone(), pipeline_id, config)
    }
}

/// Extract pipeline ids from any of the list response shapes.
fn pipeline_ids_from_response(value: &Value) -> Vec<String> {
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match map.get("pipelines") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![value],
        },
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            entry
                .get("id")
                .or_else(|| entry.get("pipeline_id"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::pipeline::test_fixtures::{sample_config, sample_config_value};

    async fn manager(server: &MockServer) -> PipelineManager {
        PipelineManager::with_options(&ClientOptions::new(server.uri()).disable_tracking())
            .unwrap()
    }

    #[test]
    fn ids_from_bare_array() {
        let value = json!([{"id": "a"}, {"pipeline_id": "b"}]);
        assert_eq!(pipeline_ids_from_response(&value), vec!["a", "b"]);
    }

    #[test]
    fn ids_from_wrapped_object() {
        let value = json!({"pipelines": [{"id": "a"}, {"id": "b"}]});
        assert_eq!(pipeline_ids_from_response(&value), vec!["a", "b"]);
    }

    #[test]
    fn ids_from_single_object() {
        let value = json!({"id": "single-pipeline"});
        assert_eq!(pipeline_ids_from_response(&value), vec!["single-pipeline"]);
    }

    #[test]
    fn id_key_takes_priority_over_pipeline_id() {
        let value = json!([{"id": "a", "pipeline_id": "shadowed"}]);
        assert_eq!(pipeline_ids_from_response(&value), vec!["a"]);
    }

    #[test]
    fn entries_without_ids_are_skipped() {
        let value = json!([{"name": "no-id"}, {"id": 42}, {"id": "kept"}]);
        assert_eq!(pipeline_ids_from_response(&value), vec!["kept"]);
    }

    #[tokio::test]
    async fn list_returns_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/pipeline"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": "a"}, {"id": "b"}])),
            )
            .mount(&server)
            .await;

        let ids = manager(&server).await.list().await.unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn list_treats_404_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ids = manager(&server).await.list().await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn list_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .mount(&server)
            .await;

        let err = manager(&server).await.list().await.unwrap_err();
        assert!(matches!(err, EtlError::InternalServer(body) if body == "down"));
    }

    #[tokio::test]
    async fn create_deploys_and_returns_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/pipeline"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let pipeline = manager(&server).await.create(sample_config()).await.unwrap();
        assert_eq!(pipeline.pipeline_id(), "test-pipeline");
        assert!(pipeline.config().is_some());
    }

    #[tokio::test]
    async fn create_from_value_rejects_invalid_config_locally() {
        let server = MockServer::start().await;
        let mut config = sample_config_value();
        config["pipeline_id"] = json!("");

        let err = manager(&server).await.create_from_value(config).await.unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn get_returns_hydrated_handle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/pipeline/test-pipeline"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_config_value()))
            .mount(&server)
            .await;

        let pipeline = manager(&server).await.get("test-pipeline").await.unwrap();
        assert_eq!(pipeline.config().unwrap().pipeline_id, "test-pipeline");
    }

    #[tokio::test]
    async fn delete_by_id_resolves_then_deletes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/pipeline/test-pipeline"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_config_value()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/pipeline/test-pipeline"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        manager(&server).await.delete("test-pipeline").await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = manager(&server).await.delete("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Pipeline with id 'missing' not found");
    }
}
