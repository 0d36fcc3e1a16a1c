//! Update expression rendering.
//!
//! Turns structured [`UpdateParams`] into the `SET` expression and
//! placeholder maps the key-value store expects. Attribute names that
//! collide with reserved words (or are not plain identifiers) go through
//! `#name` placeholders; every value goes through a positional `:v{index}`
//! placeholder.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use super::{Result, StoreError, TableSchema, UpdateParams};

/// Reserved words that show up as attribute names in this service.
///
/// The store reserves several hundred words; this covers the ones a tenant
/// record can realistically carry.
const RESERVED_WORDS: &[&str] = &[
    "ACCOUNT", "ACTION", "COMMENT", "COUNT", "DATA", "DATE", "GROUP", "KEY", "LEVEL", "NAME",
    "OWNER", "PLAN", "REGION", "ROLE", "SIZE", "STATE", "STATUS", "TIMESTAMP", "TTL", "TYPE",
    "USER", "VALUE", "ZONE",
];

/// Rendered form of an update, ready to hand to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedUpdate {
    pub expression: String,
    /// `#placeholder` -> attribute name.
    pub names: BTreeMap<String, String>,
    /// `:placeholder` -> value.
    pub values: BTreeMap<String, Value>,
}

/// Returns true if the store reserves this word.
pub fn is_reserved_word(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    RESERVED_WORDS.contains(&upper.as_str())
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Renders the `SET` expression for an update.
///
/// Fails with [`StoreError::Validation`] when there is nothing to set, when an
/// assignment targets the partition key, or when an attribute is assigned twice.
pub fn render_update_expression(
    params: &UpdateParams,
    schema: &TableSchema,
) -> Result<RenderedUpdate> {
    if params.assignments.is_empty() {
        return Err(StoreError::Validation(
            "update must set at least one attribute".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut clauses = Vec::with_capacity(params.assignments.len());
    let mut names = BTreeMap::new();
    let mut values = BTreeMap::new();

    for (index, (attribute, value)) in params.assignments.iter().enumerate() {
        if attribute == &schema.partition_key.name {
            return Err(StoreError::Validation(format!(
                "cannot update attribute {attribute}: it is part of the key"
            )));
        }
        if !seen.insert(attribute.as_str()) {
            return Err(StoreError::Validation(format!(
                "attribute {attribute} is assigned more than once"
            )));
        }

        let plain = is_plain_identifier(attribute);

        let name_ref = if !plain {
            let placeholder = format!("#n{index}");
            names.insert(placeholder.clone(), attribute.clone());
            placeholder
        } else if is_reserved_word(attribute) {
            let placeholder = format!("#{attribute}");
            names.insert(placeholder.clone(), attribute.clone());
            placeholder
        } else {
            attribute.clone()
        };

        let value_ref = format!(":v{index}");
        values.insert(value_ref.clone(), value.clone());

        clauses.push(format!("{name_ref} = {value_ref}"));
    }

    Ok(RenderedUpdate {
        expression: format!("SET {}", clauses.join(", ")),
        names,
        values,
    })
}
