//! ClickHouse sink configuration

use serde::{Deserialize, Serialize};

use super::ClickhouseDataType;

/// Kind of sink a pipeline writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkType {
    #[default]
    Clickhouse,
}

/// Mapping of one source field onto one destination column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMapping {
    /// Name of a topic declared in `SourceConfig.topics`
    pub source_id: String,
    pub field_name: String,
    pub column_name: String,
    pub column_type: ClickhouseDataType,
}

/// Sink half of a pipeline: the ClickHouse table events land in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(rename = "type", default)]
    pub sink_type: SinkType,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub secure: bool,
    pub table: String,
    pub table_mapping: Vec<TableMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_batch_size: Option<u32>,
    /// Wire duration literal, e.g. `"10s"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_time: Option<String>,
}
