#[cfg(feature = "dynamodb")]
pub mod conversions;
mod error;
mod expression;
mod http_mapping;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use expression::{is_reserved_word, render_update_expression, RenderedUpdate};
pub use http_mapping::{store_error_to_status_code, FLATTENED_ERROR_STATUS};
pub use traits::{KeyedTable, StoreSettings, TableConnector};
pub use types::{
    AttributeType, DeleteParams, Item, Key, KeyAttribute, ProvisionedThroughput, ReturnValues,
    ScanParams, TableSchema, UpdateParams,
};
