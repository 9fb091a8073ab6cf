//! HTTP transport shared by the SDK clients.
//!
//! A thin wrapper over a pooled [`reqwest::Client`]: attaches the base
//! address, serializes the body, issues exactly one request per call, and
//! classifies the outcome. Status-to-error mapping is supplied per call
//! site; the transport itself is mapping-agnostic. Connection failures are
//! never retried here — retry policy belongs to the caller.

use std::time::Duration;

use glassflow_domain::EtlError;
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Default address of a locally running GlassFlow ETL service.
pub const DEFAULT_URL: &str = "http://localhost:8080";

const USER_AGENT: &str = concat!("glassflow-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// Transport over HTTP to one GlassFlow ETL service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    http: ReqwestClient,
    base_url: Url,
}

impl Transport {
    /// Start building a transport.
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new(base_url: &str) -> Result<Self, EtlError> {
        Self::builder().base_url(base_url).build()
    }

    /// Base address this transport talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one request and classify the outcome.
    ///
    /// - 2xx: the raw response is handed back for domain-specific decoding.
    /// - non-2xx: the body text is read and `map_status` is consulted first;
    ///   unmapped statuses become [`EtlError::InternalServer`] carrying the
    ///   body text.
    /// - no response at all: [`EtlError::Connection`].
    pub async fn request<F>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        map_status: F,
    ) -> Result<Response, EtlError>
    where
        F: Fn(StatusCode, &str) -> Option<EtlError>,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| EtlError::Connection(format!("invalid request path '{path}': {err}")))?;

        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| EtlError::Connection(err.to_string()))?;

        let status = response.status();
        debug!(%method, %url, %status, "received response");

        if status.is_success() {
            return Ok(response);
        }

        let body_text = response.text().await.unwrap_or_default();
        match map_status(status, &body_text) {
            Some(err) => Err(err),
            None => Err(EtlError::InternalServer(body_text)),
        }
    }
}

/// Builder for [`Transport`].
#[derive(Debug)]
pub struct TransportBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl TransportBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<Transport, EtlError> {
        let base_url = Url::parse(&self.base_url).map_err(|err| {
            EtlError::Connection(format!("invalid service url '{}': {err}", self.base_url))
        })?;

        let http = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|err| EtlError::Connection(format!("failed to build HTTP client: {err}")))?;

        Ok(Transport { http, base_url })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn no_mapping(_status: StatusCode, _body: &str) -> Option<EtlError> {
        None
    }

    #[tokio::test]
    async fn success_hands_back_raw_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/pipeline/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = Transport::new(&server.uri()).unwrap();
        let response = transport
            .request(Method::GET, "/api/v1/pipeline/p1", None, no_mapping)
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn body_is_serialized_as_json() {
        let server = MockServer::start().await;
        let payload = serde_json::json!({"pipeline_id": "p1"});
        Mock::given(method("POST"))
            .and(path("/api/v1/pipeline"))
            .and(body_json(payload.clone()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let transport = Transport::new(&server.uri()).unwrap();
        transport
            .request(Method::POST, "/api/v1/pipeline", Some(&payload), no_mapping)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unmapped_status_becomes_internal_server_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let transport = Transport::new(&server.uri()).unwrap();
        let err = transport.request(Method::GET, "/x", None, no_mapping).await.unwrap_err();
        match err {
            EtlError::InternalServer(body) => assert_eq!(body, "overloaded"),
            other => panic!("expected InternalServer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mapped_status_wins_over_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = Transport::new(&server.uri()).unwrap();
        let err = transport
            .request(Method::GET, "/x", None, |status, _| {
                (status == StatusCode::NOT_FOUND)
                    .then(|| EtlError::PipelineNotFound("p1".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::PipelineNotFound(id) if id == "p1"));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so requests fail with ECONNREFUSED

        let transport = Transport::new(&format!("http://{addr}")).unwrap();
        let err = transport.request(Method::GET, "/x", None, no_mapping).await.unwrap_err();
        assert!(matches!(err, EtlError::Connection(_)));
        assert!(err.to_string().starts_with("Failed to connect to GlassFlow ETL service"));
    }

    #[test]
    fn invalid_base_url_is_rejected_at_build() {
        let err = Transport::new("not a url").unwrap_err();
        assert!(matches!(err, EtlError::Connection(_)));
    }
}
