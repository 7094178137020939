use chrono::SecondsFormat;

use crate::planning::PlannedPost;
use crate::posts::BlogPost;

const POST_HEADERS: [&str; 8] = [
    "ID",
    "Title",
    "Slug",
    "Status",
    "Published Date",
    "Category",
    "Tags",
    "Author",
];

const PLANNED_HEADERS: [&str; 8] = [
    "ID",
    "Title",
    "Planned Date",
    "Status",
    "Priority",
    "Tags",
    "Estimated Read Time",
    "Description",
];

/// Quotes a CSV field, doubling embedded quotes.
pub fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn render<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let header = headers
        .iter()
        .map(|h| quote_field(h))
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header)
        .chain(rows.into_iter().map(|row| {
            row.iter()
                .map(|f| quote_field(f))
                .collect::<Vec<_>>()
                .join(",")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders posts as CSV with a header row. Tags are joined with `;`.
pub fn posts_to_csv(posts: &[BlogPost]) -> String {
    render(
        &POST_HEADERS,
        posts.iter().map(|post| {
            vec![
                post.id.clone(),
                post.title.clone(),
                post.slug.current.clone(),
                post.status.to_string(),
                post.published_at
                    .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_default(),
                post.category.clone().unwrap_or_default(),
                post.tags.as_deref().unwrap_or_default().join(";"),
                post.author
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
            ]
        }),
    )
}

/// Renders planned posts as CSV with a header row.
pub fn planned_posts_to_csv(posts: &[PlannedPost]) -> String {
    render(
        &PLANNED_HEADERS,
        posts.iter().map(|post| {
            vec![
                post.id.to_string(),
                post.title.clone(),
                post.planned_date.to_string(),
                post.status.to_string(),
                post.priority.to_string(),
                post.tags.as_deref().unwrap_or_default().join(";"),
                post.estimated_read_time
                    .map(|m| m.to_string())
                    .unwrap_or_default(),
                post.description.clone().unwrap_or_default(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::NewPlannedPost;
    use crate::posts::demo_posts;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "\"plain\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field(""), "\"\"");
    }

    #[test]
    fn test_posts_to_csv() {
        let posts = demo_posts();
        let csv = posts_to_csv(&posts[..1]);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"ID\",\"Title\",\"Slug\""));
        assert_eq!(
            lines[1],
            "\"demo-1\",\"Getting Started with Headless CMS\",\"getting-started-with-headless-cms\",\
             \"published\",\"2024-03-18T10:00:00Z\",\"Technical\",\"cms;architecture\",\"Demo Author\""
        );
    }

    #[test]
    fn test_empty_export_has_header_only() {
        assert_eq!(posts_to_csv(&[]).lines().count(), 1);
        assert_eq!(planned_posts_to_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn test_planned_posts_to_csv() {
        let post = NewPlannedPost::new("Plan, with comma", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .with_estimated_read_time(5)
            .into_planned_post(Uuid::nil());

        let csv = planned_posts_to_csv(&[post]);
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(
            row,
            "\"00000000-0000-0000-0000-000000000000\",\"Plan, with comma\",\"2025-01-01\",\
             \"planned\",\"medium\",\"\",\"5\",\"\""
        );
    }
}
