//! blogdash CLI entry point.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogdash::cli::export::{ExportAction, ExportFormat};
use blogdash::cli::planned::PlannedAction;
use blogdash::cli::posts::{BulkAction, PostsAction};
use blogdash::cli::{Cli, Commands, OutputFormat};
use blogdash::output::{pretty, render};
use blogdash::storage::FileStorage;
use blogdash::{calendar, CmsService, Config, PlannedPostStore, QueryCache, SavedSearchStore};
use blogdash_core::export::{
    planned_posts_to_csv, posts_to_csv, summarize_content, to_pretty_json,
};

/// Print `value` in the selected format, using `human` for pretty output.
fn emit<T, F>(format: OutputFormat, value: &T, human: F)
where
    T: serde::Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    println!("{}", render(value, format, human));
}

fn write_export(content: &str, output: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "blogdash=warn" } else { "blogdash=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    let cms = CmsService::from_config(&config, Arc::new(QueryCache::new()))
        .context("Failed to set up the CMS client")?;
    let storage = Arc::new(FileStorage::new(&config.data_dir));
    let planning = PlannedPostStore::new(storage.clone());
    let searches = SavedSearchStore::new(storage);
    let format = cli.format;

    match cli.command {
        Commands::Posts(posts_cmd) => match posts_cmd.action {
            PostsAction::List { page, limit } => {
                let page = cms.fetch_posts_paginated(page, limit).await?;
                emit(format, &page, pretty::format_page);
            }
            PostsAction::Get { slug } => match cms.fetch_post_by_slug(&slug).await? {
                Some(post) => emit(format, &post, pretty::format_post),
                None => bail!("No post with slug {}", slug),
            },
            PostsAction::Metadata => {
                let metadata = cms.fetch_posts_metadata().await?;
                emit(format, &metadata[..], pretty::format_metadata);
            }
            PostsAction::Range { start, end } => {
                let range = blogdash_core::calendar::DateRange::new(start, end)?;
                let posts = cms
                    .fetch_posts_by_date_range(range.start_instant(), range.end_instant())
                    .await?;
                emit(format, &posts[..], pretty::format_posts);
            }
            PostsAction::Drafts => {
                let drafts = cms.fetch_draft_posts().await?;
                emit(format, &drafts[..], pretty::format_posts);
            }
            PostsAction::Create(args) => {
                let post = cms.create_post(args.into_new_post()).await?;
                emit(format, &post, |p| format!("Created:\n{}", pretty::format_post(p)));
            }
            PostsAction::Update(args) => {
                let (id, patch) = args.into_patch();
                match cms.update_post(&id, patch).await? {
                    Some(post) => {
                        emit(format, &post, |p| format!("Updated:\n{}", pretty::format_post(p)))
                    }
                    None => bail!("No post with ID {}", id),
                }
            }
            PostsAction::Delete { id } => {
                if !cms.delete_post(&id).await? {
                    bail!("No post with ID {}", id);
                }
                if !cli.quiet {
                    println!("Deleted post {}", id);
                }
            }
            PostsAction::Search(args) => {
                let filters = match &args.saved {
                    Some(name) => match searches.find(name)? {
                        Some(saved) => saved.filters,
                        None => bail!("No saved search named {}", name),
                    },
                    None => args.filters(),
                };
                if let Some(name) = &args.save {
                    searches.save_search(name, filters.clone())?;
                }
                let posts = cms.search_posts(&filters).await?;
                emit(format, &posts[..], pretty::format_posts);
            }
            PostsAction::Searches => {
                let saved = searches.load()?;
                emit(format, &saved[..], pretty::format_saved_searches);
            }
            PostsAction::ForgetSearch { name } => {
                if !searches.delete_search(&name)? {
                    bail!("No saved search named {}", name);
                }
                if !cli.quiet {
                    println!("Removed saved search {}", name);
                }
            }
            PostsAction::Bulk { action } => {
                let outcome = match action {
                    BulkAction::Delete { ids } => cms.bulk_delete(&ids).await?,
                    BulkAction::Status { status, ids } => {
                        cms.bulk_set_status(&ids, status).await?
                    }
                    BulkAction::Tag { tags, ids } => cms.bulk_add_tags(&ids, &tags).await?,
                };
                emit(format, &outcome, pretty::format_bulk_outcome);
                if !outcome.is_complete() {
                    bail!("Bulk operation did not apply to every post");
                }
            }
            PostsAction::PublishDue { dry_run } => {
                let now = Utc::now();
                if dry_run {
                    let due = cms.fetch_due_posts(now).await?;
                    emit(format, &due[..], pretty::format_posts);
                } else {
                    let outcome = cms.publish_due_posts(now).await?;
                    emit(format, &outcome, pretty::format_bulk_outcome);
                    if !outcome.is_complete() {
                        bail!("Some scheduled posts could not be published");
                    }
                }
            }
        },
        Commands::Planned(planned_cmd) => match planned_cmd.action {
            PlannedAction::List => {
                let posts = planning.load()?;
                emit(format, &posts[..], pretty::format_planned_posts);
            }
            PlannedAction::Board => {
                let board = planning.planning_board();
                emit(format, &board, pretty::format_board);
            }
            PlannedAction::Add(args) => {
                let post = planning.add_planned_post(args.into_new_planned_post())?;
                emit(format, &post, |p| {
                    format!("Added:\n{}", pretty::format_planned_post(p))
                });
            }
            PlannedAction::Update(args) => {
                let (id, patch) = args.into_patch();
                match planning.update_planned_post(id, patch)? {
                    Some(post) => emit(format, &post, |p| {
                        format!("Updated:\n{}", pretty::format_planned_post(p))
                    }),
                    None => bail!("No planned post with ID {}", id),
                }
            }
            PlannedAction::Delete { id } => {
                if !planning.delete_planned_post(id)? {
                    bail!("No planned post with ID {}", id);
                }
                if !cli.quiet {
                    println!("Deleted planned post {}", id);
                }
            }
        },
        Commands::Calendar(args) => {
            let (year, month) = args.resolve(Utc::now().date_naive());
            let view = calendar::load_month_view(&cms, &planning, year, month).await?;
            emit(format, &view, pretty::format_month);
        }
        Commands::Export(export_cmd) => match export_cmd.action {
            ExportAction::Posts(options) => {
                let posts = cms.fetch_all_posts().await?;
                let content = match options.format {
                    ExportFormat::Csv => posts_to_csv(&posts),
                    ExportFormat::Json => to_pretty_json(&posts)?,
                };
                write_export(&content, options.output.as_deref(), cli.quiet)?;
            }
            ExportAction::Planned(options) => {
                let posts = planning.load()?;
                let content = match options.format {
                    ExportFormat::Csv => planned_posts_to_csv(&posts),
                    ExportFormat::Json => to_pretty_json(&posts)?,
                };
                write_export(&content, options.output.as_deref(), cli.quiet)?;
            }
            ExportAction::Summary { output } => {
                let posts = cms.fetch_all_posts().await?;
                let summary = summarize_content(&posts, &planning.get_planned_posts());
                match (&output, format) {
                    (None, OutputFormat::Pretty) => println!("{}", pretty::format_summary(&summary)),
                    _ => write_export(&to_pretty_json(&summary)?, output.as_deref(), cli.quiet)?,
                }
            }
        },
    }

    Ok(())
}
