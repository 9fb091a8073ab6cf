//! Kafka and ClickHouse data types plus the wire-compatibility table

use std::fmt;

use serde::{Deserialize, Serialize};

/// Data type of a field in a Kafka event schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KafkaDataType {
    String,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
    Uuid,
}

/// Column type of a ClickHouse table sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickhouseDataType {
    String,
    FixedString,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    Float32,
    Float64,
    DateTime,
    DateTime64,
    #[serde(rename = "UUID")]
    Uuid,
}

impl KafkaDataType {
    /// ClickHouse column types a field of this type may be mapped onto.
    ///
    /// Narrowing conversions are rejected; widening integer and float
    /// conversions are allowed. String fields may feed date/uuid columns
    /// because the service parses them on ingestion.
    pub fn compatible_clickhouse_types(self) -> &'static [ClickhouseDataType] {
        use ClickhouseDataType as Ch;
        match self {
            Self::String => {
                &[Ch::String, Ch::FixedString, Ch::DateTime, Ch::DateTime64, Ch::Uuid]
            }
            Self::Bool => &[Ch::Bool, Ch::UInt8],
            Self::Int8 => &[Ch::Int8, Ch::Int16, Ch::Int32, Ch::Int64],
            Self::Int16 => &[Ch::Int16, Ch::Int32, Ch::Int64],
            Self::Int32 => &[Ch::Int32, Ch::Int64],
            Self::Int64 => &[Ch::Int64],
            Self::Float32 => &[Ch::Float32, Ch::Float64],
            Self::Float64 => &[Ch::Float64],
            Self::Bytes => &[Ch::String],
            Self::Uuid => &[Ch::Uuid, Ch::String],
        }
    }

    /// Whether this Kafka type may be written into the given column type.
    pub fn is_compatible_with(self, column: ClickhouseDataType) -> bool {
        self.compatible_clickhouse_types().contains(&column)
    }

    /// Wire name of the type (lowercase, as serialized).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
        }
    }
}

impl ClickhouseDataType {
    /// Wire name of the column type, as ClickHouse spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::FixedString => "FixedString",
            Self::Bool => "Bool",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::DateTime => "DateTime",
            Self::DateTime64 => "DateTime64",
            Self::Uuid => "UUID",
        }
    }
}

impl fmt::Display for KafkaDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ClickhouseDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
