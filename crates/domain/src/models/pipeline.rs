//! Root pipeline configuration and its cross-field validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{validate_time_window, JoinConfig, SinkConfig, SourceConfig};
use crate::errors::ConfigValidationError;

/// Complete, validated description of one pipeline.
///
/// Constructed through [`PipelineConfig::new`] (typed path) or
/// [`PipelineConfig::from_value`] (untyped-mapping path); both run the full
/// cross-field validation before returning. Instances are treated as
/// immutable: build a new config to change anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub pipeline_id: String,
    pub source: SourceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinConfig>,
    pub sink: SinkConfig,
}

impl PipelineConfig {
    /// Build and validate a configuration from typed parts.
    pub fn new(
        pipeline_id: impl Into<String>,
        source: SourceConfig,
        join: Option<JoinConfig>,
        sink: SinkConfig,
    ) -> Result<Self, ConfigValidationError> {
        let config = Self { pipeline_id: pipeline_id.into(), source, join, sink };
        config.validate()?;
        Ok(config)
    }

    /// Build and validate a configuration from an untyped JSON mapping.
    ///
    /// The mapping is converted once, at this boundary; everything past it
    /// only ever sees the typed form.
    pub fn from_value(value: Value) -> Result<Self, ConfigValidationError> {
        let config: Self = serde_json::from_value(value)
            .map_err(|err| ConfigValidationError::new("pipeline", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to the wire shape: aliased field names, absent optional
    /// fields omitted entirely.
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Run the full cross-field validation.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.pipeline_id.trim().is_empty() {
            return Err(ConfigValidationError::new(
                "pipeline_id",
                "pipeline_id cannot be empty",
            ));
        }

        self.validate_source()?;
        self.validate_join()?;
        self.validate_sink()?;
        Ok(())
    }

    fn validate_source(&self) -> Result<(), ConfigValidationError> {
        if self.source.topics.is_empty() {
            return Err(ConfigValidationError::new(
                "source.topics",
                "source must declare at least one topic",
            ));
        }

        for (index, topic) in self.source.topics.iter().enumerate() {
            let Some(dedup) = &topic.deduplication else { continue };

            validate_time_window(
                &format!("source.topics[{index}].deduplication.time_window"),
                &dedup.time_window,
            )?;

            if dedup.enabled && topic.schema_field(&dedup.id_field).is_none() {
                return Err(ConfigValidationError::new(
                    format!("source.topics[{index}].deduplication.id_field"),
                    format!(
                        "Deduplication id field '{}' does not exist in topic '{}' schema",
                        dedup.id_field, topic.name
                    ),
                ));
            }
        }
        Ok(())
    }

    fn validate_join(&self) -> Result<(), ConfigValidationError> {
        let Some(join) = &self.join else { return Ok(()) };
        if !join.enabled {
            return Ok(());
        }

        if join.sources.len() != 2 {
            return Err(ConfigValidationError::new(
                "join.sources",
                "join requires exactly two sources when enabled",
            ));
        }
        if join.sources[0].orientation == join.sources[1].orientation {
            return Err(ConfigValidationError::new(
                "join.sources",
                "join sources must declare one left and one right orientation",
            ));
        }

        for (index, source) in join.sources.iter().enumerate() {
            validate_time_window(
                &format!("join.sources[{index}].time_window"),
                &source.time_window,
            )?;

            let Some(topic) = self.source.topic(&source.source_id) else {
                return Err(ConfigValidationError::new(
                    format!("join.sources[{index}].source_id"),
                    format!("Source ID '{}' does not exist in any topic", source.source_id),
                ));
            };

            if topic.schema_field(&source.join_key).is_none() {
                return Err(ConfigValidationError::new(
                    format!("join.sources[{index}].join_key"),
                    format!(
                        "Join key '{}' does not exist in source '{}' schema",
                        source.join_key, source.source_id
                    ),
                ));
            }
        }
        Ok(())
    }

    fn validate_sink(&self) -> Result<(), ConfigValidationError> {
        for (index, mapping) in self.sink.table_mapping.iter().enumerate() {
            let Some(topic) = self.source.topic(&mapping.source_id) else {
                return Err(ConfigValidationError::new(
                    format!("sink.table_mapping[{index}].source_id"),
                    format!("Source ID '{}' does not exist in any topic", mapping.source_id),
                ));
            };

            let Some(field) = topic.schema_field(&mapping.field_name) else {
                return Err(ConfigValidationError::new(
                    format!("sink.table_mapping[{index}].field_name"),
                    format!(
                        "Field '{}' does not exist in source '{}' event schema",
                        mapping.field_name, mapping.source_id
                    ),
                ));
            };

            if !field.field_type.is_compatible_with(mapping.column_type) {
                return Err(ConfigValidationError::new(
                    format!("sink.table_mapping[{index}].column_type"),
                    format!(
                        "Data type '{}' is not compatible with source type '{}' for field '{}' in source '{}'",
                        mapping.column_type, field.field_type, mapping.field_name, mapping.source_id
                    ),
                ));
            }
        }
        Ok(())
    }
}
