use std::path::PathBuf;

use clap::{Parser, Subcommand};
use redtally_core::CollectionPeriod;
use redtally_reddit::{SearchSort, TimeWindow};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "redtally")]
#[command(about = "Track game mentions on Reddit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every registered game and print per-day aggregates
    Aggregate {
        /// Games registry file (defaults to `REDTALLY_GAMES_PATH`)
        #[arg(long)]
        games: Option<PathBuf>,
        /// Subreddit to search; repeatable (defaults to `REDTALLY_SUBREDDITS`)
        #[arg(long = "subreddit", short = 's')]
        subreddits: Vec<String>,
        /// Pin one sort instead of the full cascade
        #[arg(long)]
        sort: Option<SearchSort>,
    },
    /// Search subreddits for a phrase and print matching submissions
    Search {
        query: String,
        #[arg(long = "subreddit", short = 's')]
        subreddits: Vec<String>,
        #[arg(long)]
        sort: Option<SearchSort>,
        #[arg(long, default_value = "year")]
        time_window: TimeWindow,
        /// Cap per underlying query
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List recent submissions in subreddits
    New {
        /// D, W, M or Y
        #[arg(long)]
        period: CollectionPeriod,
        #[arg(long = "subreddit", short = 's')]
        subreddits: Vec<String>,
        /// Cap per subreddit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List recent submissions by authors
    Authors {
        /// D, W, M or Y
        #[arg(long)]
        period: CollectionPeriod,
        #[arg(long = "author", short = 'a', required = true)]
        authors: Vec<String>,
        /// Cap per author
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = redtally_core::load_app_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Aggregate {
            games,
            subreddits,
            sort,
        } => commands::run_aggregate(&config, games, subreddits, sort).await,
        Commands::Search {
            query,
            subreddits,
            sort,
            time_window,
            limit,
        } => {
            let options = redtally_reddit::SearchOptions {
                sort,
                time_window,
                limit,
            };
            commands::run_search(&config, &query, subreddits, options).await
        }
        Commands::New {
            period,
            subreddits,
            limit,
        } => commands::run_new(&config, subreddits, period, limit).await,
        Commands::Authors {
            period,
            authors,
            limit,
        } => commands::run_authors(&config, &authors, period, limit).await,
    }
}
