use serde_json::{Map, Value};

use super::{Result, StoreError};

/// A stored record: attribute name to JSON value.
pub type Item = Map<String, Value>;

/// Store attribute types usable as keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    /// A string-typed key attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::String,
        }
    }
}

/// Provisioned read/write capacity declared for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionedThroughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl Default for ProvisionedThroughput {
    fn default() -> Self {
        Self {
            read_capacity_units: 5,
            write_capacity_units: 5,
        }
    }
}

/// Shape of one declared table.
///
/// Built once at startup and shared read-only; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub throughput: ProvisionedThroughput,
}

impl TableSchema {
    /// Creates a schema with a single string partition key.
    pub fn new(table_name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: KeyAttribute::string(partition_key),
            throughput: ProvisionedThroughput::default(),
        }
    }

    /// Sets the provisioned throughput.
    pub fn with_throughput(mut self, throughput: ProvisionedThroughput) -> Self {
        self.throughput = throughput;
        self
    }

    /// Builds the key for a partition key value.
    pub fn key(&self, value: impl Into<String>) -> Key {
        Key {
            attribute: self.partition_key.name.clone(),
            value: value.into(),
        }
    }

    /// Checks that a key names exactly this table's partition key and is not empty.
    pub fn validate_key(&self, key: &Key) -> Result<()> {
        if key.attribute != self.partition_key.name {
            return Err(StoreError::Validation(format!(
                "key attribute '{}' does not match partition key '{}'",
                key.attribute, self.partition_key.name
            )));
        }
        if key.value.trim().is_empty() {
            return Err(StoreError::Validation(format!(
                "partition key '{}' must not be empty",
                key.attribute
            )));
        }
        Ok(())
    }

    /// Extracts the partition key from an item.
    pub fn key_of(&self, item: &Item) -> Result<Key> {
        let name = &self.partition_key.name;
        match item.get(name) {
            Some(Value::String(value)) => {
                let key = self.key(value.clone());
                self.validate_key(&key)?;
                Ok(key)
            }
            Some(_) => Err(StoreError::Validation(format!(
                "partition key '{name}' must be a string"
            ))),
            None => Err(StoreError::Validation(format!(
                "item is missing partition key '{name}'"
            ))),
        }
    }
}

/// Partition key of a single record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub attribute: String,
    pub value: String,
}

/// Parameters for a full-table scan.
///
/// Only the first page is returned; `limit` caps the page size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanParams {
    pub limit: Option<i32>,
}

impl ScanParams {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Which attributes an update returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnValues {
    None,
    /// Only the attributes touched by the update, with their new values.
    #[default]
    UpdatedNew,
    AllNew,
}

/// Parameters for a keyed update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateParams {
    pub key: Key,
    /// Attribute assignments in the order they appear in the `SET` expression.
    pub assignments: Vec<(String, Value)>,
    pub return_values: ReturnValues,
}

impl UpdateParams {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            assignments: Vec::new(),
            return_values: ReturnValues::default(),
        }
    }

    /// Adds an attribute assignment.
    pub fn set(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.push((attribute.into(), value.into()));
        self
    }

    pub fn return_values(mut self, return_values: ReturnValues) -> Self {
        self.return_values = return_values;
        self
    }
}

/// Parameters for a keyed delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteParams {
    pub key: Key,
}

impl DeleteParams {
    pub fn new(key: Key) -> Self {
        Self { key }
    }
}
