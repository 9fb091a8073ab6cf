//! Two-topic join configuration

use serde::{Deserialize, Serialize};

/// Join semantics between the two sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
}

/// Side a join source sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinOrientation {
    Left,
    Right,
}

/// One side of a join: a topic, its key field, and its buffering window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSourceConfig {
    /// Name of a topic declared in `SourceConfig.topics`
    pub source_id: String,
    pub join_key: String,
    /// Wire duration literal, e.g. `"1h"`
    pub time_window: String,
    pub orientation: JoinOrientation,
}

/// Optional join stage combining records from two topics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JoinConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub join_type: JoinType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<JoinSourceConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_join_serializes_without_sources() {
        let join = JoinConfig::default();
        let value = serde_json::to_value(&join).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["enabled"], false);
        assert!(!object.contains_key("sources"));
    }

    #[test]
    fn join_type_uses_wire_alias() {
        let join = JoinConfig { enabled: true, join_type: JoinType::Left, sources: vec![] };
        let value = serde_json::to_value(&join).unwrap();
        assert_eq!(value["type"], "left");
    }
}
