//! Mapping between domain shapes and DynamoDB item maps.
//!
//! These functions are total: converting never fails, and absent or
//! mistyped attributes in stored items decode to their zero values.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};

use super::attr;
use crate::{Class, Document, Field};

// Class table columns.
pub(crate) const ATTR_CLASS_ID: &str = "ClassId";
pub(crate) const ATTR_NAME: &str = "Name";
pub(crate) const ATTR_CREATED: &str = "Created";
pub(crate) const ATTR_UPDATED: &str = "Updated";
pub(crate) const ATTR_FIELDS: &str = "Fields";

// Document table columns (ClassId is shared with the class table).
pub(crate) const ATTR_DOCUMENT_ID: &str = "DocumentId";
pub(crate) const ATTR_VERSION: &str = "Version";
pub(crate) const ATTR_PARENT_ID: &str = "ParentId";
pub(crate) const ATTR_TEMPLATE_ID: &str = "TemplateId";
pub(crate) const ATTR_TITLE: &str = "Title";
pub(crate) const ATTR_URL: &str = "Url";
pub(crate) const ATTR_VALUES: &str = "Values";

/// Stored in the `ParentId` column when a document has no parent. The
/// secondary index cannot index an absent attribute, so absence is encoded
/// as this reserved marker; the leading `#` keeps it out of the space of
/// valid ids. Converts back to an empty string in the domain shape.
pub const NO_PARENT: &str = "#NULL#";

pub fn class_to_item(class: &Class) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ATTR_CLASS_ID.to_string(),
            AttributeValue::S(class.id.clone()),
        ),
        (ATTR_NAME.to_string(), AttributeValue::S(class.name.clone())),
        (ATTR_CREATED.to_string(), time_to_attr(class.created)),
        (ATTR_UPDATED.to_string(), time_to_attr(class.updated)),
        (
            ATTR_FIELDS.to_string(),
            AttributeValue::L(class.fields.iter().map(field_to_attr).collect()),
        ),
    ])
}

pub fn class_from_item(item: &HashMap<String, AttributeValue>) -> Class {
    Class {
        id: get_s(item, ATTR_CLASS_ID),
        name: get_s(item, ATTR_NAME),
        created: get_time(item, ATTR_CREATED),
        updated: get_time(item, ATTR_UPDATED),
        fields: match item.get(ATTR_FIELDS) {
            Some(AttributeValue::L(fields)) => fields.iter().map(field_from_attr).collect(),
            _ => Vec::new(),
        },
    }
}

pub fn document_to_item(doc: &Document) -> HashMap<String, AttributeValue> {
    let parent_id = if doc.parent_id.is_empty() {
        NO_PARENT.to_string()
    } else {
        doc.parent_id.clone()
    };

    HashMap::from([
        (
            ATTR_DOCUMENT_ID.to_string(),
            AttributeValue::S(doc.id.clone()),
        ),
        (
            ATTR_VERSION.to_string(),
            AttributeValue::N(doc.version.to_string()),
        ),
        (
            ATTR_CLASS_ID.to_string(),
            AttributeValue::S(doc.class_id.clone()),
        ),
        (ATTR_PARENT_ID.to_string(), AttributeValue::S(parent_id)),
        (
            ATTR_TEMPLATE_ID.to_string(),
            AttributeValue::S(doc.template_id.clone()),
        ),
        (ATTR_TITLE.to_string(), AttributeValue::S(doc.title.clone())),
        (ATTR_URL.to_string(), AttributeValue::S(doc.url.clone())),
        (
            ATTR_VALUES.to_string(),
            AttributeValue::M(attr::map_to_attrs(&doc.values)),
        ),
    ])
}

pub fn document_from_item(item: &HashMap<String, AttributeValue>) -> Document {
    let parent_id = get_s(item, ATTR_PARENT_ID);

    Document {
        id: get_s(item, ATTR_DOCUMENT_ID),
        version: get_n(item, ATTR_VERSION),
        class_id: get_s(item, ATTR_CLASS_ID),
        parent_id: if parent_id == NO_PARENT {
            String::new()
        } else {
            parent_id
        },
        template_id: get_s(item, ATTR_TEMPLATE_ID),
        title: get_s(item, ATTR_TITLE),
        url: get_s(item, ATTR_URL),
        values: match item.get(ATTR_VALUES) {
            Some(AttributeValue::M(values)) => attr::attrs_to_map(values),
            _ => serde_json::Map::new(),
        },
    }
}

fn field_to_attr(field: &Field) -> AttributeValue {
    AttributeValue::M(HashMap::from([
        (
            ATTR_NAME.to_string(),
            AttributeValue::S(field.name.clone()),
        ),
        (
            "Label".to_string(),
            AttributeValue::S(field.label.clone()),
        ),
        (
            "Type".to_string(),
            AttributeValue::S(field.field_type.clone()),
        ),
        ("Sort".to_string(), AttributeValue::Bool(field.sort)),
    ]))
}

fn field_from_attr(attr: &AttributeValue) -> Field {
    let AttributeValue::M(map) = attr else {
        return Field::default();
    };
    Field {
        name: get_s(map, ATTR_NAME),
        label: get_s(map, "Label"),
        field_type: get_s(map, "Type"),
        sort: matches!(map.get("Sort"), Some(AttributeValue::Bool(true))),
    }
}

/// Timestamps persist as integer Unix microseconds; sub-microsecond
/// precision does not round-trip.
fn time_to_attr(time: DateTime<Utc>) -> AttributeValue {
    AttributeValue::N(time.timestamp_micros().to_string())
}

fn get_time(item: &HashMap<String, AttributeValue>, name: &str) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(get_n(item, name)).unwrap_or_default()
}

fn get_s(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    match item.get(name) {
        Some(AttributeValue::S(s)) => s.clone(),
        _ => String::new(),
    }
}

fn get_n(item: &HashMap<String, AttributeValue>, name: &str) -> i64 {
    match item.get(name) {
        Some(AttributeValue::N(n)) => n.parse().unwrap_or_default(),
        _ => 0,
    }
}
