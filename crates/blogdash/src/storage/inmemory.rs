//! In-memory document store.
//!
//! Evaluates queries directly over the stored documents. Used for tests
//! and for local runs against seeded data.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use blogdash_core::posts::BlogPost;
use blogdash_core::query::{evaluate, Query};
use blogdash_core::storage::{DocumentStore, Result, StoreError};

/// Document store backed by a `HashMap`, keyed by `_id`.
///
/// Insertion order is kept so that ties in query ordering are stable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Documents>>,
}

#[derive(Debug, Default)]
struct Documents {
    order: Vec<String>,
    by_id: HashMap<String, Value>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given posts.
    pub fn with_posts(posts: &[BlogPost]) -> Self {
        let mut documents = Documents::default();
        for post in posts {
            documents.order.push(post.id.clone());
            documents.by_id.insert(post.id.clone(), post.to_document());
        }
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    /// Inserts or replaces a raw document. It must carry a string `_id`.
    pub async fn insert(&self, document: Value) -> Result<()> {
        let id = document_id(&document)?;
        let mut documents = self.documents.write().await;
        if documents.by_id.insert(id.clone(), document).is_none() {
            documents.order.push(id);
        }
        Ok(())
    }

    /// Number of stored documents of every type.
    pub async fn len(&self) -> usize {
        self.documents.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn document_id(document: &Value) -> Result<String> {
    document
        .get("_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidData("document has no _id".to_string()))
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch(&self, query: &Query) -> Result<Value> {
        let documents = self.documents.read().await;
        let ordered: Vec<Value> = documents
            .order
            .iter()
            .filter_map(|id| documents.by_id.get(id).cloned())
            .collect();
        let resolve = |id: &str| documents.by_id.get(id).cloned();
        Ok(evaluate(query, &ordered, resolve))
    }

    async fn create(&self, document: Value) -> Result<Value> {
        let Value::Object(mut fields) = document else {
            return Err(StoreError::InvalidData(
                "document must be a JSON object".to_string(),
            ));
        };

        let id = match fields.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                fields.insert("_id".to_string(), Value::from(id.clone()));
                id
            }
        };
        let stamp = now_stamp();
        fields
            .entry("_createdAt")
            .or_insert_with(|| Value::from(stamp.clone()));
        fields
            .entry("_updatedAt")
            .or_insert_with(|| Value::from(stamp));

        let mut documents = self.documents.write().await;
        if documents.by_id.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                entity_type: "Document",
                id,
            });
        }
        let document = Value::Object(fields);
        documents.order.push(id.clone());
        documents.by_id.insert(id, document.clone());
        Ok(document)
    }

    async fn patch(&self, id: &str, set: Map<String, Value>) -> Result<Value> {
        let mut documents = self.documents.write().await;
        let Some(Value::Object(fields)) = documents.by_id.get_mut(id) else {
            return Err(StoreError::NotFound {
                entity_type: "Document",
                id: id.to_string(),
            });
        };

        for (key, value) in set {
            // Identity is immutable.
            if key != "_id" {
                fields.insert(key, value);
            }
        }
        Ok(Value::Object(fields.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        if documents.by_id.remove(id).is_none() {
            return Err(StoreError::NotFound {
                entity_type: "Document",
                id: id.to_string(),
            });
        }
        documents.order.retain(|existing| existing != id);
        Ok(())
    }
}
