//! Typed pipeline configuration model
//!
//! Wire names follow the service convention: `type` and `schema` on the
//! wire map to `source_type`/`sink_type`/`join_type` and `event_schema` in
//! Rust, and absent optional fields are omitted from payloads entirely.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigValidationError;

mod data_types;
mod join;
mod pipeline;
mod sink;
mod source;

pub use data_types::{ClickhouseDataType, KafkaDataType};
pub use join::{JoinConfig, JoinOrientation, JoinSourceConfig, JoinType};
pub use pipeline::PipelineConfig;
pub use sink::{SinkConfig, SinkType, TableMapping};
pub use source::{
    ConsumerGroupOffset, DeduplicationConfig, KafkaConnectionParams, KafkaMechanism,
    KafkaProtocol, Schema, SchemaField, SchemaType, SourceConfig, SourceType, TopicConfig,
};

static TIME_WINDOW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(ms|s|m|h|d)$").expect("time window pattern is valid"));

/// Check a wire duration literal such as `"1h"` or `"30m"`.
///
/// Windows stay as strings so serialized configs round-trip byte-exact;
/// only the shape is validated here.
pub(crate) fn validate_time_window(
    field: &str,
    value: &str,
) -> Result<(), ConfigValidationError> {
    if TIME_WINDOW_RE.is_match(value) {
        Ok(())
    } else {
        Err(ConfigValidationError::new(
            field,
            format!("invalid time window '{value}'; expected a duration like '1h', '30m' or '15s'"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_duration_literals() {
        for window in ["1h", "30m", "15s", "500ms", "2d"] {
            assert!(validate_time_window("deduplication.time_window", window).is_ok());
        }
    }

    #[test]
    fn rejects_malformed_windows() {
        for window in ["", "h1", "1 h", "1hour", "-1h"] {
            let err = validate_time_window("deduplication.time_window", window)
                .unwrap_err();
            assert_eq!(err.field, "deduplication.time_window");
        }
    }
}
