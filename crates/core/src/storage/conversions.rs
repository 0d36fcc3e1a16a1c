//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between JSON records and DynamoDB
//! `AttributeValue` maps. The server's table handles and the xtask seeder
//! both encode items through these, so stored records look the same no
//! matter who wrote them.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};

use super::{Item, StoreError};

/// Convert a JSON value to a DynamoDB attribute.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(item_to_attributes(map)),
    }
}

/// Convert a DynamoDB attribute to a JSON value.
pub fn attribute_to_json(attribute: &AttributeValue) -> Result<Value, StoreError> {
    match attribute {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => attributes_to_item(map).map(Value::Object),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::B(_) | AttributeValue::Bs(_) => Err(StoreError::Validation(
            "binary attributes are not supported".to_string(),
        )),
        other => Err(StoreError::Validation(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

/// Convert a JSON record to a DynamoDB item.
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), json_to_attribute(value)))
        .collect()
}

/// Convert a DynamoDB item to a JSON record.
pub fn attributes_to_item(attributes: &HashMap<String, AttributeValue>) -> Result<Item, StoreError> {
    attributes
        .iter()
        .map(|(name, attribute)| Ok((name.clone(), attribute_to_json(attribute)?)))
        .collect()
}

fn parse_number(n: &str) -> Result<Number, StoreError> {
    serde_json::from_str::<Number>(n)
        .map_err(|e| StoreError::Validation(format!("Invalid number {}: {}", n, e)))
}
