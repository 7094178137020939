//! CLI command definitions.

pub mod calendar;
pub mod export;
pub mod planned;
pub mod posts;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Content dashboard for a headless-CMS blog.
#[derive(Debug, Parser)]
#[command(name = "blogdash")]
#[command(version, about = "Content dashboard for a headless-CMS blog", long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    /// Directory holding local planning data.
    #[arg(long, env = "BLOGDASH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Posts in the CMS.
    Posts(posts::PostsCommand),
    /// Locally planned posts.
    Planned(planned::PlannedCommand),
    /// Month view of published, draft and planned posts.
    Calendar(calendar::CalendarArgs),
    /// Export posts, planned posts or a summary.
    Export(export::ExportCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["blogdash", "posts", "list"]).unwrap();

        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(!cli.quiet);
        match cli.command {
            Commands::Posts(cmd) => match cmd.action {
                posts::PostsAction::List { page, limit } => {
                    assert_eq!(page, 1);
                    assert_eq!(limit, 10);
                }
                other => panic!("unexpected action: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "blogdash",
            "--format",
            "json",
            "--quiet",
            "--data-dir",
            "/tmp/plans",
            "posts",
            "drafts",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/plans")));
    }

    #[test]
    fn test_planned_add() {
        let cli = Cli::try_parse_from([
            "blogdash",
            "planned",
            "add",
            "--title",
            "Launch post",
            "--date",
            "2025-01-01",
            "--status",
            "in-progress",
            "--priority",
            "high",
            "--tags",
            "rust,launch",
        ])
        .unwrap();

        let Commands::Planned(cmd) = cli.command else {
            panic!("expected planned command");
        };
        let planned::PlannedAction::Add(args) = cmd.action else {
            panic!("expected add");
        };
        let post = args.into_new_planned_post();
        assert_eq!(post.title, "Launch post");
        assert_eq!(post.planned_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(post.tags, Some(vec!["rust".to_string(), "launch".to_string()]));
    }

    #[test]
    fn test_export_format() {
        let cli =
            Cli::try_parse_from(["blogdash", "export", "posts", "--format", "json"]).unwrap();

        let Commands::Export(cmd) = cli.command else {
            panic!("expected export command");
        };
        match cmd.action {
            export::ExportAction::Posts(options) => {
                assert_eq!(options.format, export::ExportFormat::Json);
                assert!(options.output.is_none());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let result = Cli::try_parse_from([
            "blogdash", "posts", "create", "--title", "T", "--status", "archived",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_posts_search() {
        let cli = Cli::try_parse_from([
            "blogdash",
            "posts",
            "search",
            "headless",
            "--status",
            "published,scheduled",
            "--tag",
            "cms",
            "--from",
            "2024-03-01",
            "--sort",
            "title",
            "--order",
            "asc",
            "--save",
            "CMS posts",
        ])
        .unwrap();

        let Commands::Posts(cmd) = cli.command else {
            panic!("expected posts command");
        };
        let posts::PostsAction::Search(args) = cmd.action else {
            panic!("expected search");
        };
        let filters = args.filters();
        assert_eq!(filters.query, "headless");
        assert_eq!(
            filters.statuses,
            vec![
                blogdash_core::posts::PostStatus::Published,
                blogdash_core::posts::PostStatus::Scheduled
            ]
        );
        assert_eq!(filters.tags, vec!["cms".to_string()]);
        assert_eq!(filters.from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filters.sort_by, blogdash_core::posts::SearchSort::Title);
        assert_eq!(filters.sort_order, blogdash_core::posts::SortOrder::Asc);
        assert_eq!(args.save.as_deref(), Some("CMS posts"));
    }

    #[test]
    fn test_search_save_conflicts_with_saved() {
        let result = Cli::try_parse_from([
            "blogdash", "posts", "search", "--save", "a", "--saved", "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_posts_bulk() {
        let cli = Cli::try_parse_from([
            "blogdash", "posts", "bulk", "tag", "--tags", "rust,cms", "p1", "p2",
        ])
        .unwrap();

        let Commands::Posts(cmd) = cli.command else {
            panic!("expected posts command");
        };
        match cmd.action {
            posts::PostsAction::Bulk {
                action: posts::BulkAction::Tag { tags, ids },
            } => {
                assert_eq!(tags, vec!["rust".to_string(), "cms".to_string()]);
                assert_eq!(ids, vec!["p1".to_string(), "p2".to_string()]);
            }
            other => panic!("unexpected action: {other:?}"),
        }

        assert!(Cli::try_parse_from(["blogdash", "posts", "bulk", "delete"]).is_err());
    }

    #[test]
    fn test_publish_due() {
        let cli =
            Cli::try_parse_from(["blogdash", "posts", "publish-due", "--dry-run"]).unwrap();

        let Commands::Posts(cmd) = cli.command else {
            panic!("expected posts command");
        };
        assert!(matches!(
            cmd.action,
            posts::PostsAction::PublishDue { dry_run: true }
        ));
    }
}
