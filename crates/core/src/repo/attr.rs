//! Total conversion between `serde_json::Value` and DynamoDB attributes,
//! used for the free-form document `values` payload.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

pub fn to_attr(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attr).collect()),
        Value::Object(map) => AttributeValue::M(map_to_attrs(map)),
    }
}

/// Attribute types with no JSON counterpart (binary, sets) come back as
/// null rather than failing; malformed stored data is a schema-migration
/// problem, not a runtime condition.
pub fn from_attr(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(items) => Value::Array(items.iter().map(from_attr).collect()),
        AttributeValue::M(map) => Value::Object(attrs_to_map(map)),
        _ => Value::Null,
    }
}

pub fn map_to_attrs(map: &Map<String, Value>) -> HashMap<String, AttributeValue> {
    map.iter().map(|(k, v)| (k.clone(), to_attr(v))).collect()
}

pub fn attrs_to_map(attrs: &HashMap<String, AttributeValue>) -> Map<String, Value> {
    attrs.iter().map(|(k, v)| (k.clone(), from_attr(v))).collect()
}

fn parse_number(n: &str) -> Value {
    if let Ok(int) = n.parse::<i64>() {
        return Value::Number(Number::from(int));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
