//! Client construction options

use std::sync::Arc;
use std::time::Duration;

use glassflow_domain::EtlError;

use crate::tracking::{TrackEvents, Tracking};
use crate::transport::{Transport, DEFAULT_URL};

/// Options shared by every client in this crate.
///
/// Telemetry is configured here, per client, instead of through any global
/// state; by default it follows the environment (see [`Tracking::from_env`]).
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base address of the GlassFlow ETL service
    pub url: String,
    /// Telemetry capability handed to the constructed clients
    pub tracking: Tracking,
    /// Request timeout enforced by the transport
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            tracking: Tracking::from_env(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Options pointing at the given service address.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }

    /// Opt out of usage telemetry.
    #[must_use]
    pub fn disable_tracking(mut self) -> Self {
        self.tracking = self.tracking.disable();
        self
    }

    /// Use a custom telemetry sink.
    #[must_use]
    pub fn with_tracker(mut self, sink: Arc<dyn TrackEvents>) -> Self {
        self.tracking = Tracking::with_sink(sink);
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn build_transport(&self) -> Result<Transport, EtlError> {
        Transport::builder().base_url(&self.url).timeout(self.timeout).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let options = ClientOptions::default();
        assert_eq!(options.url, "http://localhost:8080");
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn disable_tracking_turns_the_capability_off() {
        let options = ClientOptions::new("http://etl:9000").disable_tracking();
        assert!(!options.tracking.is_enabled());
    }
}
