//! Kafka source configuration

use serde::{Deserialize, Serialize};

use super::KafkaDataType;

/// Kind of streaming source feeding a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Kafka,
}

/// Security protocol used when connecting to the Kafka brokers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KafkaProtocol {
    Plaintext,
    Ssl,
    SaslPlaintext,
    SaslSsl,
}

/// SASL authentication mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KafkaMechanism {
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    #[serde(rename = "SCRAM-SHA-512")]
    ScramSha512,
    #[serde(rename = "PLAIN")]
    Plain,
}

/// Offset the consumer group starts from when first attaching to a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumerGroupOffset {
    #[default]
    Earliest,
    Latest,
    Committed,
}

/// Serialization format of a topic's event schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    #[default]
    Json,
}

/// Connection and authentication parameters for the Kafka source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KafkaConnectionParams {
    pub brokers: Vec<String>,
    pub protocol: KafkaProtocol,
    pub mechanism: KafkaMechanism,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Root CA certificate material, when the brokers use a private CA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_ca: Option<String>,
    #[serde(default)]
    pub skip_auth: bool,
}

/// A single named field of a topic's event schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: KafkaDataType,
}

/// Ordered event schema of a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default)]
    pub schema_type: SchemaType,
    pub fields: Vec<SchemaField>,
}

/// Duplicate suppression over a keyed time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Field whose value keys the deduplication window
    pub id_field: String,
    pub id_field_type: KafkaDataType,
    /// Wire duration literal, e.g. `"1h"`
    pub time_window: String,
}

/// A Kafka topic consumed by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    #[serde(default)]
    pub consumer_group_initial_offset: ConsumerGroupOffset,
    #[serde(rename = "schema")]
    pub event_schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication: Option<DeduplicationConfig>,
}

/// Source half of a pipeline: where events come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(rename = "type", default)]
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub connection_params: KafkaConnectionParams,
    pub topics: Vec<TopicConfig>,
}

impl KafkaProtocol {
    /// Wire name of the protocol, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::Ssl => "SSL",
            Self::SaslPlaintext => "SASL_PLAINTEXT",
            Self::SaslSsl => "SASL_SSL",
        }
    }
}

impl KafkaMechanism {
    /// Wire name of the mechanism, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha512 => "SCRAM-SHA-512",
            Self::Plain => "PLAIN",
        }
    }
}

impl TopicConfig {
    /// Look up a schema field by name.
    pub fn schema_field(&self, name: &str) -> Option<&SchemaField> {
        self.event_schema.fields.iter().find(|field| field.name == name)
    }
}

impl SourceConfig {
    /// Look up a topic by name.
    pub fn topic(&self, name: &str) -> Option<&TopicConfig> {
        self.topics.iter().find(|topic| topic.name == name)
    }
}
