//! Reddit collection for redtally.
//!
//! Searches subreddits with a sort cascade that works around Reddit's
//! per-query result ceiling, filters out stemmed false positives, dedups
//! across sorts and terms, lists recent submissions per subreddit or author,
//! and rolls matches up into per-game daily aggregates.

pub mod aggregate;
pub mod api;
pub mod client;
pub mod error;
pub mod matching;
pub mod record;
pub mod search;
pub mod terms;
pub mod types;
pub mod windowed;

mod paging;
mod retry;

#[cfg(test)]
mod fake;

pub use aggregate::{
    aggregate, aggregate_for_games, aggregate_for_games_as_of, bucket_by_date, summarize,
    AggregationRecord, DailyAggregates,
};
pub use api::RedditApi;
pub use client::RedditClient;
pub use error::RedditError;
pub use matching::{match_location, matches, MatchLocation};
pub use record::{estimate_downvotes, SubmissionRecord};
pub use search::{SearchEngine, SearchOptions, SearchStream, DEFAULT_COVERAGE_CEILING};
pub use terms::TermSearch;
pub use types::{Listing, PageRequest, RawItem, RawPost, SearchRequest, SearchSort, TimeWindow};
pub use windowed::WindowedFetcher;
