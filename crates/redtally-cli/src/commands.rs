//! Command handlers. Each connects to Reddit, runs one collector and prints
//! JSON to stdout.

use std::path::PathBuf;
use std::pin::pin;

use anyhow::Context;
use futures::StreamExt;
use redtally_core::{load_games, AppConfig, CollectionPeriod};
use redtally_reddit::{
    aggregate_for_games, RedditClient, SearchEngine, SearchOptions, SearchSort, WindowedFetcher,
};
use serde::Serialize;

/// Subreddits from the command line, falling back to the configured default.
///
/// # Errors
///
/// Returns an error if neither source names a subreddit.
pub(crate) fn resolve_subreddits(
    config: &AppConfig,
    from_cli: Vec<String>,
) -> anyhow::Result<Vec<String>> {
    let subreddits = if from_cli.is_empty() {
        config.subreddits.clone()
    } else {
        from_cli
    };
    anyhow::ensure!(
        !subreddits.is_empty(),
        "no subreddits given; pass --subreddit or set REDTALLY_SUBREDDITS"
    );
    Ok(subreddits)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<RedditClient> {
    RedditClient::new(config)
        .await
        .context("failed to authenticate with Reddit")
}

pub(crate) async fn run_aggregate(
    config: &AppConfig,
    games_path: Option<PathBuf>,
    subreddits: Vec<String>,
    sort: Option<SearchSort>,
) -> anyhow::Result<()> {
    let subreddits = resolve_subreddits(config, subreddits)?;
    let path = games_path.unwrap_or_else(|| config.games_path.clone());
    let games = load_games(&path)
        .with_context(|| format!("failed to load games from {}", path.display()))?
        .into_games();
    tracing::info!(games = games.len(), subreddits = ?subreddits, "starting aggregation");

    let client = connect(config).await?;
    let engine = SearchEngine::new(&client).with_coverage_ceiling(config.coverage_ceiling);
    let daily = aggregate_for_games(&engine, &games, &subreddits, sort).await?;

    print_json(&daily)
}

/// Prints one JSON object per line as records arrive.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    subreddits: Vec<String>,
    options: SearchOptions,
) -> anyhow::Result<()> {
    let subreddits = resolve_subreddits(config, subreddits)?;
    let client = connect(config).await?;
    let engine = SearchEngine::new(&client).with_coverage_ceiling(config.coverage_ceiling);

    let mut stream = pin!(engine.search(query, &subreddits, options).into_stream());
    let mut count = 0usize;
    while let Some(record) = stream.next().await {
        println!("{}", serde_json::to_string(&record?)?);
        count += 1;
    }
    tracing::info!(query, matches = count, "search finished");
    Ok(())
}

pub(crate) async fn run_new(
    config: &AppConfig,
    subreddits: Vec<String>,
    period: CollectionPeriod,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let subreddits = resolve_subreddits(config, subreddits)?;
    let client = connect(config).await?;
    let records = WindowedFetcher::new(&client)
        .fetch_new_in_channels(&subreddits, period, limit)
        .await?;
    print_json(&records)
}

pub(crate) async fn run_authors(
    config: &AppConfig,
    authors: &[String],
    period: CollectionPeriod,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let client = connect(config).await?;
    let records = WindowedFetcher::new(&client)
        .fetch_new_by_authors(authors, period, limit)
        .await?;
    print_json(&records)
}
