//! Post CLI commands.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use blogdash_core::posts::{
    NewPost, PostPatch, PostStatus, SearchFilters, SearchSort, Slug, SortOrder,
};

/// Post management commands.
#[derive(Debug, Parser)]
pub struct PostsCommand {
    #[command(subcommand)]
    pub action: PostsAction,
}

/// Available post actions.
#[derive(Debug, Subcommand)]
pub enum PostsAction {
    /// List one page of posts, newest first.
    List {
        /// Page number, starting at 1.
        #[arg(long, default_value = "1")]
        page: u32,
        /// Posts per page (at most 100).
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Get a post by slug, including its body.
    Get {
        /// Post slug.
        slug: String,
    },
    /// List the lightweight metadata of every post.
    Metadata,
    /// List posts published between two dates (inclusive).
    Range {
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,
    },
    /// List drafts, most recently edited first.
    Drafts,
    /// Create a new post.
    Create(CreatePostArgs),
    /// Update a post.
    Update(UpdatePostArgs),
    /// Delete a post by ID.
    Delete {
        /// Post ID.
        id: String,
    },
    /// Search posts by text, status, category, tag and date.
    Search(SearchArgs),
    /// List saved searches.
    Searches,
    /// Remove a saved search.
    ForgetSearch {
        /// Saved search name.
        name: String,
    },
    /// Apply one change to many posts.
    Bulk {
        #[command(subcommand)]
        action: BulkAction,
    },
    /// Publish scheduled posts whose time has come.
    PublishDue {
        /// Only list the posts that would be published.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Bulk post actions.
#[derive(Debug, Subcommand)]
pub enum BulkAction {
    /// Delete several posts.
    Delete {
        /// Post IDs.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Set the status of several posts.
    Status {
        /// New status.
        #[arg(long)]
        status: PostStatus,
        /// Post IDs.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Add tags to several posts.
    Tag {
        /// Comma-separated tags to add.
        #[arg(long, value_delimiter = ',', required = true)]
        tags: Vec<String>,
        /// Post IDs.
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for in titles, excerpts, categories and tags.
    pub query: Option<String>,
    /// Comma-separated statuses.
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<PostStatus>,
    /// Comma-separated categories.
    #[arg(long, value_delimiter = ',')]
    pub category: Vec<String>,
    /// Comma-separated tags; a post matches if it has any of them.
    #[arg(long, value_delimiter = ',')]
    pub tag: Vec<String>,
    /// Earliest date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Sort field: created, updated or title.
    #[arg(long, default_value = "created")]
    pub sort: SearchSort,
    /// Sort order: asc or desc.
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
    /// Save these filters under a name.
    #[arg(long, conflicts_with = "saved")]
    pub save: Option<String>,
    /// Run a saved search instead of the filters above.
    #[arg(long)]
    pub saved: Option<String>,
}

impl SearchArgs {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: self.query.clone().unwrap_or_default(),
            statuses: self.status.clone(),
            categories: self.category.clone(),
            tags: self.tag.clone(),
            from: self.from,
            to: self.to,
            sort_by: self.sort,
            sort_order: self.order,
        }
    }
}

#[derive(Debug, Args)]
pub struct CreatePostArgs {
    /// Post title.
    #[arg(long)]
    pub title: String,
    /// Slug (derived from the title when omitted).
    #[arg(long)]
    pub slug: Option<String>,
    /// Post status.
    #[arg(long, default_value = "draft")]
    pub status: PostStatus,
    /// Short summary.
    #[arg(long)]
    pub excerpt: Option<String>,
    /// Category name.
    #[arg(long)]
    pub category: Option<String>,
    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Publish time (RFC 3339).
    #[arg(long)]
    pub published_at: Option<DateTime<Utc>>,
}

impl CreatePostArgs {
    pub fn into_new_post(self) -> NewPost {
        let mut post = NewPost::new(self.title).with_status(self.status);
        if let Some(slug) = self.slug {
            post = post.with_slug(slug);
        }
        if let Some(excerpt) = self.excerpt {
            post = post.with_excerpt(excerpt);
        }
        if let Some(category) = self.category {
            post = post.with_category(category);
        }
        if !self.tags.is_empty() {
            post = post.with_tags(self.tags);
        }
        if let Some(published_at) = self.published_at {
            post = post.with_published_at(published_at);
        }
        post
    }
}

#[derive(Debug, Args)]
pub struct UpdatePostArgs {
    /// Post ID.
    pub id: String,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New slug.
    #[arg(long)]
    pub slug: Option<String>,
    /// New status.
    #[arg(long)]
    pub status: Option<PostStatus>,
    /// New excerpt.
    #[arg(long)]
    pub excerpt: Option<String>,
    /// New category.
    #[arg(long)]
    pub category: Option<String>,
    /// Replacement tags, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
    /// New publish time (RFC 3339).
    #[arg(long)]
    pub published_at: Option<DateTime<Utc>>,
    /// New scheduled time (RFC 3339).
    #[arg(long)]
    pub scheduled_date: Option<DateTime<Utc>>,
}

impl UpdatePostArgs {
    /// Splits the arguments into the post id and the patch.
    pub fn into_patch(self) -> (String, PostPatch) {
        let patch = PostPatch {
            title: self.title,
            slug: self.slug.map(Slug::new),
            status: self.status,
            excerpt: self.excerpt,
            category: self.category,
            tags: self.tags,
            published_at: self.published_at,
            scheduled_date: self.scheduled_date,
            ..Default::default()
        };
        (self.id, patch)
    }
}
