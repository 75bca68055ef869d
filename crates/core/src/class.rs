use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content-type schema. Documents reference the class that defines their
/// shape via [`crate::Document::class_id`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Caller-supplied identifier, immutable once created.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created: DateTime<Utc>,
    /// Refreshed on every mutation.
    #[serde(default)]
    pub updated: DateTime<Utc>,
    /// Ordered field definitions. Always a sequence, never null: an absent
    /// `fields` in incoming JSON deserializes to an empty vec, and the
    /// storage layer round-trips it as an empty list.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A single field definition within a class schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Whether list views sort on this field.
    #[serde(default)]
    pub sort: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_to_empty_vec() {
        let class: Class = serde_json::from_str(r#"{"id":"page","name":"Page"}"#).unwrap();
        assert!(class.fields.is_empty());

        // And always serialize back out as an empty array, never null.
        let json = serde_json::to_string(&class).unwrap();
        assert!(json.contains(r#""fields":[]"#));
    }

    #[test]
    fn field_type_uses_type_key() {
        let field: Field = serde_json::from_str(r#"{"name":"body","type":"text"}"#).unwrap();
        assert_eq!(field.field_type, "text");
    }
}
