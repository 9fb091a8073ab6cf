//! Best-effort usage telemetry.
//!
//! Telemetry is a capability handed to each client at construction time:
//! there is no process-global flag. Emission is fire-and-forget — events are
//! posted from a spawned task and every failure is swallowed. Telemetry can
//! never alter the result of an operation.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

const MIXPANEL_ENDPOINT: &str = "https://api.mixpanel.com/track";
const DISTINCT_ID: &str = "glassflow-clickhouse-etl";
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sink for telemetry events.
///
/// Implementations must not block and must not fail the caller.
pub trait TrackEvents: Send + Sync {
    /// Record one event. `properties` is always a JSON object.
    fn track_event(&self, name: &str, properties: Value);
}

/// Telemetry capability held by each client.
///
/// Cloning shares the underlying sink. A disabled handle (or one with no
/// sink) emits nothing.
#[derive(Clone, Default)]
pub struct Tracking {
    sink: Option<Arc<dyn TrackEvents>>,
    disabled: bool,
}

impl Tracking {
    /// Handle that never emits anything.
    pub fn disabled() -> Self {
        Self { sink: None, disabled: true }
    }

    /// Handle emitting into the given sink.
    pub fn with_sink(sink: Arc<dyn TrackEvents>) -> Self {
        Self { sink: Some(sink), disabled: false }
    }

    /// Default capability from the environment: `GF_TRACKING_ENABLED=false`
    /// opts out, and a Mixpanel sink is attached when `MIXPANEL_TOKEN` is
    /// set. Without a token nothing is emitted.
    pub fn from_env() -> Self {
        let opted_out = std::env::var("GF_TRACKING_ENABLED")
            .map(|value| value.eq_ignore_ascii_case("false"))
            .unwrap_or(false);
        if opted_out {
            return Self::disabled();
        }
        match std::env::var("MIXPANEL_TOKEN") {
            Ok(token) if !token.is_empty() => {
                Self::with_sink(Arc::new(MixpanelTracker::new(token)))
            }
            _ => Self::default(),
        }
    }

    /// Turn this handle off, keeping the sink for re-enabling via clone sites.
    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Whether events currently reach a sink.
    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.sink.is_some()
    }

    /// Emit an event; a no-op when disabled or sinkless.
    pub(crate) fn emit(&self, name: &str, properties: Value) {
        if self.disabled {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.track_event(name, properties);
        }
    }
}

impl std::fmt::Debug for Tracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracking")
            .field("disabled", &self.disabled)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

/// Mixpanel-backed telemetry sink.
pub struct MixpanelTracker {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl MixpanelTracker {
    /// Sink posting to the Mixpanel ingestion API with the given project
    /// token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: MIXPANEL_ENDPOINT.to_string(),
            token: token.into(),
        }
    }

    /// Redirect events to a custom ingestion endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl TrackEvents for MixpanelTracker {
    fn track_event(&self, name: &str, properties: Value) {
        let mut props = match properties {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        props.insert("token".to_string(), json!(self.token));
        props.insert("distinct_id".to_string(), json!(DISTINCT_ID));
        props.insert("$insert_id".to_string(), json!(Uuid::new_v4().to_string()));
        props.insert("sdk_version".to_string(), json!(SDK_VERSION));
        props.insert("platform".to_string(), json!(std::env::consts::OS));

        let payload = json!([{ "event": name, "properties": Value::Object(props) }]);

        // Emission must never block or fail the caller: outside a runtime the
        // event is dropped, inside one it is posted from a detached task.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(event = name, "telemetry event dropped: no async runtime");
            return;
        };
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let event = name.to_string();
        handle.spawn(async move {
            if let Err(err) = http.post(&endpoint).json(&payload).send().await {
                debug!(event = %event, error = %err, "telemetry event dropped");
            }
        });
    }
}
