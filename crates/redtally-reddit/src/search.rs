//! Coverage-seeking subreddit search.
//!
//! Reddit ranks search results and then returns only the top ~250, so a busy
//! query under one sort can silently drop matches. [`SearchEngine::search`]
//! runs the query under a first sort and, once the call has seen at least
//! `coverage_ceiling` posts, re-runs it under the remaining sorts for the same
//! subreddit. Posts are deduplicated by id across the whole call and kept only
//! if they literally contain the query.

use std::collections::{HashSet, VecDeque};

use futures::Stream;
use redtally_core::normalize_channel;

use crate::api::RedditApi;
use crate::error::RedditError;
use crate::matching::matches;
use crate::paging::PageCursor;
use crate::record::SubmissionRecord;
use crate::terms::TermSearch;
use crate::types::{RawPost, SearchRequest, SearchSort, TimeWindow};

/// Observed per-query result ceiling of Reddit search. Not documented by
/// Reddit; override with [`SearchEngine::with_coverage_ceiling`].
pub const DEFAULT_COVERAGE_CEILING: usize = 250;

/// Per-call search knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Pin a single sort. `None` enables the full cascade.
    pub sort: Option<SearchSort>,
    pub time_window: TimeWindow,
    /// Cap per underlying (subreddit, sort) query. `None` pages until Reddit stops.
    pub limit: Option<usize>,
}

/// Entry point for search-based collection.
///
/// Borrows the transport; each call returns a fresh stream with its own
/// dedup state.
pub struct SearchEngine<'a, A: ?Sized> {
    api: &'a A,
    coverage_ceiling: usize,
}

impl<A: ?Sized> Clone for SearchEngine<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for SearchEngine<'_, A> {}

impl<'a, A: RedditApi + ?Sized> SearchEngine<'a, A> {
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            coverage_ceiling: DEFAULT_COVERAGE_CEILING,
        }
    }

    #[must_use]
    pub fn with_coverage_ceiling(mut self, coverage_ceiling: usize) -> Self {
        self.coverage_ceiling = coverage_ceiling;
        self
    }

    /// Search `channels` in order for `query`.
    ///
    /// Nothing is fetched until the returned stream is polled. A blank query
    /// yields an empty stream without touching Reddit.
    #[must_use]
    pub fn search<S: AsRef<str>>(
        &self,
        query: &str,
        channels: &[S],
        options: SearchOptions,
    ) -> SearchStream<'a, A> {
        SearchStream::new(self.api, query, channels, options, self.coverage_ceiling)
    }

    /// Search each term independently against the `+`-joined `channels` and
    /// merge the results, deduplicated across terms.
    ///
    /// Reddit counts every OR-combined term against a single result ceiling,
    /// so one query per term recovers matches a combined query would lose.
    #[must_use]
    pub fn search_terms<T: AsRef<str>>(
        &self,
        terms: &[T],
        channels: &str,
        sort: Option<SearchSort>,
    ) -> TermSearch<'a, A> {
        TermSearch::new(*self, terms, channels, sort)
    }
}

/// Lazy result sequence of one [`SearchEngine::search`] call.
///
/// The cursor walks (subreddit, sort, page). A request is made only when the
/// buffered page is drained and the consumer asks for more.
pub struct SearchStream<'a, A: ?Sized> {
    api: &'a A,
    query: String,
    phrase: String,
    channels: Vec<String>,
    sorts: Vec<SearchSort>,
    time_window: TimeWindow,
    limit: Option<usize>,
    coverage_ceiling: usize,
    channel_idx: usize,
    sort_idx: usize,
    cursor: PageCursor,
    buffer: VecDeque<RawPost>,
    seen: HashSet<String>,
    done: bool,
}

impl<'a, A: RedditApi + ?Sized> SearchStream<'a, A> {
    fn new<S: AsRef<str>>(
        api: &'a A,
        query: &str,
        channels: &[S],
        options: SearchOptions,
        coverage_ceiling: usize,
    ) -> Self {
        let channels: Vec<String> = channels
            .iter()
            .map(|c| normalize_channel(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        let sorts = match options.sort {
            Some(sort) => vec![sort],
            None => SearchSort::CASCADE.to_vec(),
        };
        let done = query.trim().is_empty() || channels.is_empty();
        if done {
            tracing::debug!(query, "skipping search with blank query or no subreddits");
        }

        Self {
            api,
            query: query.to_string(),
            phrase: format!("\"{}\"", query.to_lowercase()),
            channels,
            sorts,
            time_window: options.time_window,
            limit: options.limit,
            coverage_ceiling,
            channel_idx: 0,
            sort_idx: 0,
            cursor: PageCursor::new(options.limit),
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            done,
        }
    }

    /// Number of distinct post ids seen so far, matching or not.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Pull the next matching record.
    ///
    /// Returns `Ok(None)` once every subreddit and sort is exhausted. The first
    /// transport error is returned as-is and ends the stream; records already
    /// handed out stay valid.
    ///
    /// # Errors
    ///
    /// Returns the [`RedditError`] of the failing page request.
    pub async fn try_next(&mut self) -> Result<Option<SubmissionRecord>, RedditError> {
        loop {
            if self.done {
                return Ok(None);
            }

            if let Some(post) = self.buffer.pop_front() {
                if let Some(record) = self.accept(post) {
                    return Ok(Some(record));
                }
                continue;
            }

            if let Some(page) = self.cursor.next_request() {
                let request = SearchRequest {
                    query: self.phrase.clone(),
                    channel: self.channels[self.channel_idx].clone(),
                    sort: self.sorts[self.sort_idx],
                    time_window: self.time_window,
                };
                match self.api.search(&request, &page).await {
                    Ok(listing) => {
                        let items = self.cursor.advance(listing);
                        tracing::debug!(
                            channel = %request.channel,
                            sort = %request.sort,
                            posts = items.len(),
                            seen = self.seen.len(),
                            "fetched search page"
                        );
                        self.buffer.extend(items);
                    }
                    Err(e) => {
                        self.done = true;
                        return Err(e);
                    }
                }
                continue;
            }

            self.advance_query();
        }
    }

    /// Drain the stream into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`]; records pulled before it are dropped.
    pub async fn collect_all(mut self) -> Result<Vec<SubmissionRecord>, RedditError> {
        let mut records = Vec::new();
        while let Some(record) = self.try_next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Adapt into a [`futures::Stream`]. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<SubmissionRecord, RedditError>> + 'a {
        futures::stream::unfold(self, |mut search| async move {
            match search.try_next().await {
                Ok(Some(record)) => Some((Ok(record), search)),
                Ok(None) => None,
                Err(e) => Some((Err(e), search)),
            }
        })
    }

    /// Mark `post` seen and convert it if it is new and literally matches.
    fn accept(&mut self, post: RawPost) -> Option<SubmissionRecord> {
        if !self.seen.insert(post.id.clone()) {
            return None;
        }
        let id = post.id.clone();
        let Some(record) = SubmissionRecord::from_raw(post) else {
            tracing::warn!(id = %id, "skipping post with unrepresentable timestamp");
            return None;
        };
        matches(&self.query, &record).then_some(record)
    }

    /// Move past an exhausted (subreddit, sort) query.
    ///
    /// After the first sort the remaining sorts run only when the call-wide
    /// seen count has reached the ceiling; otherwise the next subreddit starts.
    fn advance_query(&mut self) {
        let next_sort = self.sort_idx + 1;
        let cascade = next_sort < self.sorts.len()
            && (self.sort_idx > 0 || self.seen.len() >= self.coverage_ceiling);

        if cascade {
            if self.sort_idx == 0 {
                tracing::debug!(
                    channel = %self.channels[self.channel_idx],
                    seen = self.seen.len(),
                    ceiling = self.coverage_ceiling,
                    "coverage ceiling reached, cascading through remaining sorts"
                );
            }
            self.sort_idx = next_sort;
        } else {
            self.channel_idx += 1;
            self.sort_idx = 0;
            if self.channel_idx >= self.channels.len() {
                self.done = true;
            }
        }
        self.cursor = PageCursor::new(self.limit);
    }
}
