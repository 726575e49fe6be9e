//! Object schemas: the ordered field list that describes a custom object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Data type of a schema field.
///
/// Unrecognized type strings deserialize to [`FieldType::Other`] so that a
/// schema authored against a newer backend still loads; such values are
/// rendered as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    DateTime,
    Boolean,
    Select,
    Other,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Self::Text,
            "number" | "integer" | "float" => Self::Number,
            "date" => Self::Date,
            "datetime" | "date-time" | "timestamp" => Self::DateTime,
            "boolean" | "bool" => Self::Boolean,
            "select" | "enum" => Self::Select,
            _ => Self::Other,
        })
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // Infallible
        Ok(raw.parse().unwrap_or_default())
    }
}

/// A single field of a custom object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Unique key of the field within its schema (e.g., "amount")
    pub name: String,
    /// Human-readable label; empty when the author did not provide one
    #[serde(default)]
    pub label: String,
    /// Data type used for formatting and edit-form input
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    /// Carried for completeness; display titles use the first field instead
    #[serde(default)]
    pub is_primary: bool,
    /// Choices offered for `select` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            field_type,
            is_required: false,
            is_primary: false,
            options: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Label to show for this field, falling back to the raw name.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() { &self.name } else { &self.label }
    }
}

/// The ordered field list describing a custom object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectSchema {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// First declared field; the de facto display field for titles.
    pub fn first_field(&self) -> Option<&Field> {
        self.fields.first()
    }

    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() { &self.name } else { &self.label }
    }

    /// Drops fields whose name repeats an earlier one, keeping the first.
    pub fn dedup_fields(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.fields.retain(|field| seen.insert(field.name.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_accepts_known_and_unknown_strings() {
        let json = r#"[
            {"name": "amount", "type": "number"},
            {"name": "when", "type": "datetime"},
            {"name": "shape", "type": "polygon"}
        ]"#;
        let fields: Vec<Field> = serde_json::from_str(json).expect("deserialize fields");
        assert_eq!(fields[0].field_type, FieldType::Number);
        assert_eq!(fields[1].field_type, FieldType::DateTime);
        assert_eq!(fields[2].field_type, FieldType::Other);
        assert!(!fields[0].is_required);
        assert_eq!(fields[0].display_label(), "amount");
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut schema = ObjectSchema {
            name: "invoice".into(),
            label: String::new(),
            fields: vec![
                Field::new("amount", FieldType::Number).with_label("Amount"),
                Field::new("amount", FieldType::Text),
                Field::new("paid", FieldType::Boolean),
            ],
        };
        schema.dedup_fields();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.fields[0].field_type, FieldType::Number);
        assert_eq!(schema.first_field().map(|f| f.name.as_str()), Some("amount"));
        assert_eq!(schema.display_label(), "invoice");
    }
}
