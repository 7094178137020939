mod error;
mod http_mapping;
mod traits;

pub use error::{Result, StorageError, StorageResult, StoreError};
pub use http_mapping::store_error_from_status;
pub use traits::{DocumentStore, KeyValueStorage};
