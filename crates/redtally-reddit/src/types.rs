//! Request and response shapes exchanged with the transport.

use std::str::FromStr;

use serde::Deserialize;

/// Ranking strategy requested from Reddit search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchSort {
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl SearchSort {
    /// Sorts tried in order when the caller does not pin one.
    pub const CASCADE: [SearchSort; 5] = [
        SearchSort::Relevance,
        SearchSort::Hot,
        SearchSort::Top,
        SearchSort::New,
        SearchSort::Comments,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Hot => "hot",
            SearchSort::Top => "top",
            SearchSort::New => "new",
            SearchSort::Comments => "comments",
        }
    }
}

impl std::fmt::Display for SearchSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchSort::CASCADE
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown sort '{s}': expected relevance, hot, top, new or comments")
            })
    }
}

/// Time filter (`t=`) applied to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    #[default]
    Year,
    All,
}

impl TimeWindow {
    const ALL: [TimeWindow; 6] = [
        TimeWindow::Hour,
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeWindow::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown time window '{s}': expected hour, day, week, month, year or all")
            })
    }
}

/// One search query against one (possibly `+`-joined) subreddit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub channel: String,
    pub sort: SearchSort,
    pub time_window: TimeWindow,
}

/// Page size and continuation token for a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub after: Option<String>,
}

/// One page of a Reddit listing. `after` is `None` on the last page.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub after: Option<String>,
}

impl<T> Listing<T> {
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self { items, after: None }
    }
}

/// A submission (`t3`) as returned by Reddit.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub id: String,
    pub author: Option<String>,
    #[serde(default)]
    pub subreddit: String,
    pub created_utc: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub upvote_ratio: f64,
}

/// An entry of a user's history, which mixes submissions and comments.
#[derive(Debug, Clone)]
pub enum RawItem {
    Post(RawPost),
    Comment { id: String },
}

/// Wire envelope of every Reddit listing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingEnvelope {
    pub(crate) data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    pub(crate) children: Vec<Thing>,
    pub(crate) after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thing {
    pub(crate) kind: String,
    pub(crate) data: serde_json::Value,
}
