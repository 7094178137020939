//! HTTP document store for the hosted Sanity API.
//!
//! Queries are rendered to GROQ and sent to the query endpoint; writes go
//! through the mutate endpoint with `returnDocuments=true` so the stored
//! document comes back in the response.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use blogdash_core::query::{render_groq, Query};
use blogdash_core::storage::{store_error_from_status, DocumentStore, Result, StoreError};

use crate::config::SanityConfig;

/// Client for one Sanity project and dataset.
#[derive(Debug, Clone)]
pub struct SanityClient {
    client: reqwest::Client,
    base_url: Url,
    dataset: String,
    api_version: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    document: Option<Value>,
}

impl SanityClient {
    /// Creates a client from configuration.
    pub fn new(config: &SanityConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url())
            .map_err(|e| StoreError::ConnectionFailed(format!("invalid API host: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            dataset: config.dataset.clone(),
            api_version: config.api_version.clone(),
            token: config.token.clone(),
        })
    }

    /// Builds `/v{version}/data/{endpoint}/{dataset}`.
    fn endpoint(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(&format!(
                "v{}/data/{}/{}",
                self.api_version, endpoint, self.dataset
            ))
            .map_err(|e| StoreError::ConnectionFailed(format!("invalid endpoint URL: {e}")))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Decodes a success body or maps the status to a [`StoreError`].
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        id: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| StoreError::Serialization(e.to_string()));
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        // Mutations on a missing document fail with a conflict.
        if status.as_u16() == 409 && message.contains("not found") {
            return Err(StoreError::NotFound {
                entity_type: "Document",
                id: id.to_string(),
            });
        }
        Err(store_error_from_status(status.as_u16(), id, &message))
    }

    async fn mutate(&self, mutation: Value, id: &str) -> Result<MutateResponse> {
        let mut url = self.endpoint("mutate")?;
        url.query_pairs_mut().append_pair("returnDocuments", "true");

        tracing::debug!(url = %url, id = %id, "Sending mutation");
        let response = self
            .authorize(self.client.post(url))
            .json(&json!({ "mutations": [mutation] }))
            .send()
            .await
            .map_err(request_error)?;

        self.handle_response(response, id).await
    }
}

fn request_error(err: reqwest::Error) -> StoreError {
    StoreError::ConnectionFailed(err.to_string())
}

fn first_document(response: MutateResponse, id: &str) -> Result<Value> {
    response
        .results
        .into_iter()
        .find_map(|r| r.document)
        .ok_or_else(|| StoreError::InvalidData(format!("mutation of {id} returned no document")))
}

#[async_trait]
impl DocumentStore for SanityClient {
    async fn fetch(&self, query: &Query) -> Result<Value> {
        let groq = render_groq(query);
        let mut url = self.endpoint("query")?;
        url.query_pairs_mut().append_pair("query", &groq);

        tracing::debug!(query = %groq, "Running query");
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(request_error)?;

        let body: QueryResponse = self.handle_response(response, &query.document_type).await?;
        Ok(body.result)
    }

    async fn create(&self, document: Value) -> Result<Value> {
        let id = document
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or("new document")
            .to_string();
        let response = self.mutate(json!({ "create": document }), &id).await?;
        first_document(response, &id)
    }

    async fn patch(&self, id: &str, set: Map<String, Value>) -> Result<Value> {
        let response = self
            .mutate(json!({ "patch": { "id": id, "set": set } }), id)
            .await?;
        first_document(response, id)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.mutate(json!({ "delete": { "id": id } }), id).await?;
        // Deleting a missing document succeeds with no results.
        if response.results.iter().any(|r| r.id.as_deref() == Some(id)) {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity_type: "Document",
                id: id.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdash_core::posts::{post_by_slug_query, posts_count_query, PostPatch};
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::cache::QueryCache;
    use crate::cms::CmsService;

    fn config(host: String) -> SanityConfig {
        SanityConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-03-15".to_string(),
            token: Some("secret".to_string()),
            api_host: Some(host),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_groq_and_unwraps_result() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2024-03-15/data/query/production")
            .match_query(Matcher::UrlEncoded(
                "query".to_string(),
                r#"count(*[_type == "post"])"#.to_string(),
            ))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ms": 3, "query": "count(*[_type == \"post\"])", "result": 25}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let result = client.fetch(&posts_count_query()).await.unwrap();

        assert_eq!(result, json!(25));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_null_result() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2024-03-15/data/query/production")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ms": 1, "result": null}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let result = client.fetch(&post_by_slug_query("missing")).await.unwrap();

        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2024-03-15/data/query/production")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": "Unauthorized"}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let result = client.fetch(&posts_count_query()).await;

        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_connection_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2024-03-15/data/query/production")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let result = client.fetch(&posts_count_query()).await;

        assert_eq!(
            result,
            Err(StoreError::ConnectionFailed("503: unavailable".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_returns_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::UrlEncoded(
                "returnDocuments".to_string(),
                "true".to_string(),
            ))
            .match_body(Matcher::PartialJson(json!({
                "mutations": [{"create": {"_type": "post", "title": "Hello"}}]
            })))
            .with_status(200)
            .with_body(
                r#"{"transactionId": "t1", "results": [{"id": "new-id", "operation": "create",
                    "document": {"_id": "new-id", "_type": "post", "title": "Hello"}}]}"#,
            )
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let created = client
            .create(json!({"_type": "post", "title": "Hello"}))
            .await
            .unwrap();

        assert_eq!(created["_id"], "new-id");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_patch_sends_set() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({
                "mutations": [{"patch": {"id": "p1", "set": {"title": "Renamed"}}}]
            })))
            .with_status(200)
            .with_body(
                r#"{"results": [{"id": "p1", "operation": "update",
                    "document": {"_id": "p1", "title": "Renamed"}}]}"#,
            )
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let mut set = Map::new();
        set.insert("title".to_string(), json!("Renamed"));
        let patched = client.patch("p1", set).await.unwrap();

        assert_eq!(patched["title"], "Renamed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_patch_missing_document_is_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body(
                r#"{"error": {"description": "The mutation(s) failed: Document \"p1\" not found"}}"#,
            )
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let result = client.patch("p1", Map::new()).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let mut server = Server::new_async().await;
        let _deleted = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({"mutations": [{"delete": {"id": "p1"}}]})))
            .with_status(200)
            .with_body(r#"{"results": [{"id": "p1", "operation": "delete"}]}"#)
            .create_async()
            .await;
        let _missing = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({"mutations": [{"delete": {"id": "p2"}}]})))
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();

        assert!(client.delete("p1").await.is_ok());
        assert!(client.delete("p2").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_cms_update_of_missing_document_is_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body(r#"{"error": {"description": "Document \"gone\" not found"}}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let cms = CmsService::new(Arc::new(client), Arc::new(QueryCache::new()));
        let patch = PostPatch {
            title: Some("Revived".to_string()),
            ..Default::default()
        };

        assert_eq!(cms.update_post("gone", patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cms_delete_with_empty_results_is_false() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({"mutations": [{"delete": {"id": "gone"}}]})))
            .with_status(200)
            .with_body(r#"{"transactionId": "t2", "results": []}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let cms = CmsService::new(Arc::new(client), Arc::new(QueryCache::new()));

        assert!(!cms.delete_post("gone").await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_other_conflicts_stay_errors() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2024-03-15/data/mutate/production")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body(r#"{"error": {"description": "Revision mismatch"}}"#)
            .create_async()
            .await;

        let client = SanityClient::new(&config(server.url())).unwrap();
        let result = client.patch("p1", Map::new()).await;

        assert!(!result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = config("not a url".to_string());
        cfg.api_host = Some("::::".to_string());
        assert!(matches!(
            SanityClient::new(&cfg),
            Err(StoreError::ConnectionFailed(_))
        ));
    }
}
