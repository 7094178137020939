//! Built-in demo dataset and seed data.
//!
//! The demo dataset is what the dashboard serves when no CMS project is
//! configured. Seed posts are used to fill in-memory stores.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use super::types::{Author, BlogPost, FeaturedImage, ImageAsset, PostStatus, Seo, Slug};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .unwrap_or_default()
}

fn block(text: &str) -> serde_json::Value {
    json!({
        "_type": "block",
        "style": "normal",
        "children": [{"_type": "span", "text": text}]
    })
}

fn demo_post(
    id: &str,
    title: &str,
    slug: &str,
    status: PostStatus,
    created: DateTime<Utc>,
    published: Option<DateTime<Utc>>,
) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        created_at: created,
        updated_at: published.unwrap_or(created),
        title: title.to_string(),
        slug: Slug::new(slug),
        excerpt: None,
        content: None,
        published_at: published,
        scheduled_date: None,
        status,
        tags: None,
        category: None,
        author: Some(Author {
            name: "Demo Author".to_string(),
            email: Some("author@example.com".to_string()),
        }),
        featured_image: None,
        seo: None,
    }
}

/// Returns the fixed demo dataset, newest first.
///
/// The order matches what `all_posts_query` produces: published posts by
/// publish date descending, then unpublished ones by creation time.
pub fn demo_posts() -> Vec<BlogPost> {
    let mut getting_started = demo_post(
        "demo-1",
        "Getting Started with Headless CMS",
        "getting-started-with-headless-cms",
        PostStatus::Published,
        at(2024, 3, 1, 9),
        Some(at(2024, 3, 18, 10)),
    );
    getting_started.excerpt =
        Some("Why separating content from presentation pays off.".to_string());
    getting_started.content = Some(vec![
        block("A headless CMS stores content and serves it over an API."),
        block("The presentation layer is free to render it anywhere."),
    ]);
    getting_started.tags = Some(vec!["cms".to_string(), "architecture".to_string()]);
    getting_started.category = Some("Technical".to_string());
    getting_started.featured_image = Some(FeaturedImage {
        asset: Some(ImageAsset {
            id: Some("image-demo-1".to_string()),
            url: Some("https://images.example.com/headless.png".to_string()),
            reference: None,
        }),
        alt: Some("Diagram of a headless CMS".to_string()),
    });
    getting_started.seo = Some(Seo {
        meta_title: Some("Getting Started with Headless CMS".to_string()),
        meta_description: Some("An introduction to headless content management.".to_string()),
    });

    let mut editorial = demo_post(
        "demo-2",
        "Building an Editorial Calendar",
        "building-an-editorial-calendar",
        PostStatus::Published,
        at(2024, 2, 20, 14),
        Some(at(2024, 3, 5, 8)),
    );
    editorial.excerpt = Some("Plan a month of posts without the spreadsheet.".to_string());
    editorial.content = Some(vec![block("Start from the dates you cannot move.")]);
    editorial.tags = Some(vec!["planning".to_string(), "workflow".to_string()]);
    editorial.category = Some("Tutorial".to_string());

    let mut seo = demo_post(
        "demo-3",
        "SEO Basics for Developers",
        "seo-basics-for-developers",
        PostStatus::Published,
        at(2024, 2, 1, 11),
        Some(at(2024, 2, 12, 16)),
    );
    seo.excerpt = Some("Titles, descriptions and the rest of the essentials.".to_string());
    seo.tags = Some(vec!["seo".to_string()]);
    seo.category = Some("Technical".to_string());

    let mut scheduled = demo_post(
        "demo-4",
        "What's Next for the Blog",
        "whats-next-for-the-blog",
        PostStatus::Scheduled,
        at(2024, 3, 20, 10),
        None,
    );
    scheduled.scheduled_date = Some(at(2024, 4, 2, 9));
    scheduled.tags = Some(vec!["announcements".to_string()]);
    scheduled.category = Some("News".to_string());

    let mut draft = demo_post(
        "demo-5",
        "Writing Better Release Notes",
        "writing-better-release-notes",
        PostStatus::Draft,
        at(2024, 3, 15, 13),
        None,
    );
    draft.excerpt = Some("Release notes are documentation too.".to_string());
    draft.tags = Some(vec!["writing".to_string(), "workflow".to_string()]);

    let mut old_draft = demo_post(
        "demo-6",
        "Notes on Static Site Generators",
        "notes-on-static-site-generators",
        PostStatus::Draft,
        at(2024, 1, 8, 17),
        None,
    );
    old_draft.category = Some("Personal".to_string());

    vec![getting_started, editorial, seo, scheduled, draft, old_draft]
}

/// Generates `count` published posts, one day apart, the newest published
/// at `newest`. Ids and slugs are `seed-{n}` counting from 1.
///
/// # Example
///
/// ```
/// use blogdash_core::posts::generate_seed_posts;
/// use chrono::Utc;
///
/// let posts = generate_seed_posts(25, Utc::now());
/// assert_eq!(posts.len(), 25);
/// assert_eq!(posts[0].slug.current, "seed-1");
/// ```
pub fn generate_seed_posts(count: usize, newest: DateTime<Utc>) -> Vec<BlogPost> {
    let tags = ["rust", "cms", "planning", "seo", "workflow"];

    (0..count)
        .map(|i| {
            let n = i + 1;
            let published = newest - Duration::days(i as i64);
            let mut post = demo_post(
                &format!("seed-{n}"),
                &format!("Seed Post {n}"),
                &format!("seed-{n}"),
                PostStatus::Published,
                published - Duration::hours(6),
                Some(published),
            );
            post.tags = Some(vec![tags[i % tags.len()].to_string()]);
            post
        })
        .collect()
}
