//! One search per term, merged and deduplicated.

use std::collections::{HashSet, VecDeque};

use crate::api::RedditApi;
use crate::error::RedditError;
use crate::record::SubmissionRecord;
use crate::search::{SearchEngine, SearchOptions, SearchStream};
use crate::types::SearchSort;

/// Lazy result sequence of one [`SearchEngine::search_terms`] call.
///
/// Terms are searched one after another; each inner search keeps its own
/// dedup set and this stream keeps a second one spanning all terms.
pub struct TermSearch<'a, A: ?Sized> {
    engine: SearchEngine<'a, A>,
    terms: VecDeque<String>,
    channels: String,
    sort: Option<SearchSort>,
    current: Option<SearchStream<'a, A>>,
    seen: HashSet<String>,
}

impl<'a, A: RedditApi + ?Sized> TermSearch<'a, A> {
    pub(crate) fn new<T: AsRef<str>>(
        engine: SearchEngine<'a, A>,
        terms: &[T],
        channels: &str,
        sort: Option<SearchSort>,
    ) -> Self {
        Self {
            engine,
            terms: terms.iter().map(|t| t.as_ref().to_string()).collect(),
            channels: channels.to_string(),
            sort,
            current: None,
            seen: HashSet::new(),
        }
    }

    /// Pull the next record not yet produced for any earlier term.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`] from an underlying search; the stream
    /// is finished afterwards.
    pub async fn try_next(&mut self) -> Result<Option<SubmissionRecord>, RedditError> {
        loop {
            let Some(search) = self.current.as_mut() else {
                match self.next_search() {
                    Some(search) => self.current = Some(search),
                    None => return Ok(None),
                }
                continue;
            };

            match search.try_next().await {
                Ok(Some(record)) => {
                    if self.seen.insert(record.id.clone()) {
                        return Ok(Some(record));
                    }
                }
                Ok(None) => self.current = None,
                Err(e) => {
                    self.current = None;
                    self.terms.clear();
                    return Err(e);
                }
            }
        }
    }

    /// Drain the stream into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`] raised by any term's search.
    pub async fn collect_all(mut self) -> Result<Vec<SubmissionRecord>, RedditError> {
        let mut records = Vec::new();
        while let Some(record) = self.try_next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Start the search for the next non-empty term.
    fn next_search(&mut self) -> Option<SearchStream<'a, A>> {
        while let Some(term) = self.terms.pop_front() {
            if term.trim().is_empty() {
                continue;
            }
            tracing::debug!(term = %term, channels = %self.channels, "searching term");
            let options = SearchOptions {
                sort: self.sort,
                ..SearchOptions::default()
            };
            return Some(
                self.engine
                    .search(&term, std::slice::from_ref(&self.channels), options),
            );
        }
        None
    }
}
