//! Planned post CLI commands.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use blogdash_core::planning::{NewPlannedPost, PlannedPostPatch, PlannedStatus, Priority};

/// Planned post management commands.
#[derive(Debug, Parser)]
pub struct PlannedCommand {
    #[command(subcommand)]
    pub action: PlannedAction,
}

/// Available planned post actions.
#[derive(Debug, Subcommand)]
pub enum PlannedAction {
    /// List every planned post.
    List,
    /// Show planned posts grouped by status.
    Board,
    /// Add a planned post.
    Add(AddPlannedArgs),
    /// Update a planned post.
    Update(UpdatePlannedArgs),
    /// Delete a planned post by ID.
    Delete {
        /// Planned post ID.
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct AddPlannedArgs {
    /// Working title.
    #[arg(long)]
    pub title: String,
    /// Planned publish date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,
    /// Status: planned, in-progress or completed.
    #[arg(long, default_value = "planned")]
    pub status: PlannedStatus,
    /// Priority: low, medium or high.
    #[arg(long, default_value = "medium")]
    pub priority: Priority,
    /// Notes.
    #[arg(long)]
    pub description: Option<String>,
    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Estimated read time in minutes.
    #[arg(long)]
    pub read_time: Option<u32>,
}

impl AddPlannedArgs {
    pub fn into_new_planned_post(self) -> NewPlannedPost {
        let mut post = NewPlannedPost::new(self.title, self.date)
            .with_status(self.status)
            .with_priority(self.priority);
        if let Some(description) = self.description {
            post = post.with_description(description);
        }
        if !self.tags.is_empty() {
            post = post.with_tags(self.tags);
        }
        if let Some(minutes) = self.read_time {
            post = post.with_estimated_read_time(minutes);
        }
        post
    }
}

#[derive(Debug, Args)]
pub struct UpdatePlannedArgs {
    /// Planned post ID.
    pub id: Uuid,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New planned date.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// New status.
    #[arg(long)]
    pub status: Option<PlannedStatus>,
    /// New priority.
    #[arg(long)]
    pub priority: Option<Priority>,
    /// New notes.
    #[arg(long)]
    pub description: Option<String>,
    /// Replacement tags, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
    /// New estimated read time.
    #[arg(long)]
    pub read_time: Option<u32>,
}

impl UpdatePlannedArgs {
    pub fn into_patch(self) -> (Uuid, PlannedPostPatch) {
        let patch = PlannedPostPatch {
            title: self.title,
            description: self.description,
            planned_date: self.date,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            estimated_read_time: self.read_time,
        };
        (self.id, patch)
    }
}
