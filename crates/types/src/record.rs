//! Records of a custom object.
//!
//! A record carries a fixed envelope (`id`, `customer_id`, `created_at`) plus
//! one value per schema field. Absent values are represented by the key being
//! missing: `null` and `""` coming off the wire are dropped during
//! deserialization so the rest of the system only ever sees `Some(value)` or
//! `None`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier of a record. Backends may emit numeric or string ids; both are
/// held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// A single record of a custom object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Field values keyed by schema field name, in wire order
    #[serde(flatten, deserialize_with = "deserialize_present_values")]
    pub values: IndexMap<String, Value>,
}

fn deserialize_present_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexMap<String, Value>, D::Error> {
    let raw: IndexMap<String, Value> = IndexMap::deserialize(deserializer)?;
    Ok(raw.into_iter().filter(|(_, value)| is_present(value)).collect())
}

/// Returns true unless the value is `null` or an empty string.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter; absent-like values are not stored.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_value(name, value.into());
        self
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if is_present(&value) {
            self.values.insert(name, value);
        } else {
            self.values.shift_remove(&name);
        }
    }

    /// Value of a schema field, `None` when absent.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_envelope_and_drops_absent_values() {
        let record: Record = serde_json::from_value(json!({
            "id": 42,
            "customer_id": "c-1",
            "created_at": "2024-03-01T10:00:00Z",
            "amount": 1200.5,
            "paid": true,
            "note": "",
            "city": null
        }))
        .expect("deserialize record");

        assert_eq!(record.id.as_str(), "42");
        assert_eq!(record.customer_id.as_deref(), Some("c-1"));
        assert_eq!(record.value("amount"), Some(&json!(1200.5)));
        assert_eq!(record.value("paid"), Some(&json!(true)));
        assert_eq!(record.value("note"), None);
        assert_eq!(record.value("city"), None);
        assert!(!record.values.contains_key("id"));
        assert!(!record.values.contains_key("created_at"));
    }

    #[test]
    fn set_value_removes_on_empty() {
        let mut record = Record::new("r1").with_value("city", "London");
        record.set_value("city", json!(""));
        assert_eq!(record.value("city"), None);
    }
}
