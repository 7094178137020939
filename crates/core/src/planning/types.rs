use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_lenient_date, deserialize_optional_string};

/// Workflow state of a planned post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlannedStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl PlannedStatus {
    pub const ALL: [PlannedStatus; 3] = [
        PlannedStatus::Planned,
        PlannedStatus::InProgress,
        PlannedStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlannedStatus::Planned => "planned",
            PlannedStatus::InProgress => "in-progress",
            PlannedStatus::Completed => "completed",
        }
    }

    /// Human-readable column label.
    pub fn label(&self) -> &'static str {
        match self {
            PlannedStatus::Planned => "Planned",
            PlannedStatus::InProgress => "In Progress",
            PlannedStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for PlannedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlannedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "planned" => Ok(PlannedStatus::Planned),
            "in-progress" => Ok(PlannedStatus::InProgress),
            "completed" => Ok(PlannedStatus::Completed),
            other => Err(format!("unknown planned status: {other}")),
        }
    }
}

/// Priority of a planned post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank; lower values come first on the board.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A post being planned locally, before it exists in the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPost {
    pub id: Uuid,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(deserialize_with = "deserialize_lenient_date")]
    pub planned_date: NaiveDate,
    #[serde(default)]
    pub status: PlannedStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_read_time: Option<u32>,
}

/// Payload for adding a planned post. The id is generated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlannedPost {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_date")]
    pub planned_date: NaiveDate,
    #[serde(default)]
    pub status: PlannedStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_read_time: Option<u32>,
}

impl NewPlannedPost {
    pub fn new(title: impl Into<String>, planned_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            planned_date,
            status: PlannedStatus::default(),
            priority: Priority::default(),
            tags: None,
            estimated_read_time: None,
        }
    }

    pub fn with_status(mut self, status: PlannedStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_estimated_read_time(mut self, minutes: u32) -> Self {
        self.estimated_read_time = Some(minutes);
        self
    }

    /// Assigns an id, producing the stored record.
    pub fn into_planned_post(self, id: Uuid) -> PlannedPost {
        PlannedPost {
            id,
            title: self.title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            planned_date: self.planned_date,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            estimated_read_time: self.estimated_read_time,
        }
    }
}

/// Shallow update of a planned post. Supplied fields replace stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlannedStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_read_time: Option<u32>,
}

impl PlannedPostPatch {
    pub fn is_empty(&self) -> bool {
        *self == PlannedPostPatch::default()
    }

    /// Merges the patch into `post`. The id never changes.
    pub fn apply(self, post: &mut PlannedPost) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(description) = self.description {
            post.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(planned_date) = self.planned_date {
            post.planned_date = planned_date;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(priority) = self.priority {
            post.priority = priority;
        }
        if let Some(tags) = self.tags {
            post.tags = Some(tags);
        }
        if let Some(minutes) = self.estimated_read_time {
            post.estimated_read_time = Some(minutes);
        }
    }
}
