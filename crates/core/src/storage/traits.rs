use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::query::Query;

use super::{Result, StorageResult};

/// Contract assumed of the remote headless CMS.
///
/// Documents are schemaless JSON objects carrying `_id`, `_type`,
/// `_createdAt` and `_updatedAt`; typed conversions happen in the access
/// layer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Runs a query and returns its raw result (array, object, number or null).
    async fn fetch(&self, query: &Query) -> Result<Value>;

    /// Creates a document. The store assigns `_id` when absent.
    async fn create(&self, document: Value) -> Result<Value>;

    /// Sets the given top-level fields on a document and returns it.
    async fn patch(&self, id: &str, set: Map<String, Value>) -> Result<Value>;

    /// Deletes a document by its ID.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// A string key-value store that survives restarts.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the value stored under `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
