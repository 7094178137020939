//! Input types for post mutations.
//!
//! Both types turn into the JSON the document store receives; the caller
//! supplies `now` so timestamps stay testable.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{Author, FeaturedImage, PostStatus, Seo, Slug};

/// Document type of posts in the CMS.
pub const POST_DOCUMENT_TYPE: &str = "post";

/// Payload for creating a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    /// Derived from the title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
}

impl NewPost {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the slug the post will be created with.
    pub fn effective_slug(&self) -> String {
        self.slug
            .clone()
            .unwrap_or_else(|| super::operations::generate_slug(&self.title))
    }

    /// Builds the document to submit, stamping both timestamps with `now`.
    ///
    /// A post created as published without a publish time is published at `now`.
    pub fn into_document(mut self, now: DateTime<Utc>) -> serde_json::Result<Value> {
        if self.status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        let slug = Slug::new(self.effective_slug());
        let stamp = timestamp(now);

        let mut doc = to_object(&self)?;
        doc.insert("_type".to_string(), Value::from(POST_DOCUMENT_TYPE));
        doc.insert("title".to_string(), Value::from(self.title));
        doc.insert("status".to_string(), Value::from(self.status.as_str()));
        doc.insert("slug".to_string(), serde_json::json!({ "current": slug.current }));
        doc.insert("_createdAt".to_string(), Value::from(stamp.clone()));
        doc.insert("_updatedAt".to_string(), Value::from(stamp));
        Ok(Value::Object(doc))
    }
}

/// Partial update of a post. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
}

impl PostPatch {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        *self == PostPatch::default()
    }

    /// Moves a post to `status`. Publishing also stamps the publish time.
    pub fn status_change(status: PostStatus, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            published_at: (status == PostStatus::Published).then_some(now),
            ..Default::default()
        }
    }

    /// Builds the `set` object of the patch, refreshing `_updatedAt`.
    pub fn into_set(self, now: DateTime<Utc>) -> serde_json::Result<Map<String, Value>> {
        let mut set = to_object(&self)?;
        set.insert("_updatedAt".to_string(), Value::from(timestamp(now)));
        Ok(set)
    }
}

fn to_object<T: Serialize>(value: &T) -> serde_json::Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn published_at(doc: &Value) -> Option<DateTime<Utc>> {
        doc["publishedAt"].as_str().map(|s| s.parse().unwrap())
    }

    #[test]
    fn test_new_post_document() {
        let doc = NewPost::new("Hello World")
            .with_tags(vec!["rust".to_string()])
            .into_document(now())
            .unwrap();

        assert_eq!(doc["_type"], "post");
        assert_eq!(doc["title"], "Hello World");
        assert_eq!(doc["slug"]["current"], "hello-world");
        assert_eq!(doc["status"], "draft");
        assert_eq!(doc["tags"][0], "rust");
        assert_eq!(doc["_createdAt"], "2024-06-15T12:00:00.000Z");
        assert_eq!(doc["_updatedAt"], doc["_createdAt"]);
        assert!(doc.get("excerpt").is_none());
    }

    #[test]
    fn test_new_post_explicit_slug_wins() {
        let doc = NewPost::new("Hello World")
            .with_slug("custom")
            .into_document(now())
            .unwrap();
        assert_eq!(doc["slug"]["current"], "custom");
    }

    #[test]
    fn test_patch_sets_only_supplied_fields() {
        let patch = PostPatch {
            title: Some("New title".to_string()),
            status: Some(PostStatus::Published),
            ..Default::default()
        };

        let set = patch.into_set(now()).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set["title"], "New title");
        assert_eq!(set["status"], "published");
        assert_eq!(set["_updatedAt"], "2024-06-15T12:00:00.000Z");
    }

    #[test]
    fn test_empty_patch() {
        assert!(PostPatch::default().is_empty());
        let patch = PostPatch {
            excerpt: Some(String::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(PostPatch::default().into_set(now()).unwrap().len(), 1);
    }

    #[test]
    fn test_published_post_gets_publish_time() {
        let doc = NewPost::new("Launch Day")
            .with_status(PostStatus::Published)
            .into_document(now())
            .unwrap();
        assert_eq!(published_at(&doc), Some(now()));

        let draft = NewPost::new("Later").into_document(now()).unwrap();
        assert!(draft.get("publishedAt").is_none());
    }

    #[test]
    fn test_explicit_publish_time_is_kept() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let doc = NewPost::new("Backdated")
            .with_status(PostStatus::Published)
            .with_published_at(earlier)
            .into_document(now())
            .unwrap();
        assert_eq!(published_at(&doc), Some(earlier));
    }

    #[test]
    fn test_status_change_patch() {
        let publish = PostPatch::status_change(PostStatus::Published, now());
        assert_eq!(publish.published_at, Some(now()));

        let unpublish = PostPatch::status_change(PostStatus::Draft, now());
        assert_eq!(unpublish.status, Some(PostStatus::Draft));
        assert!(unpublish.published_at.is_none());
    }
}
