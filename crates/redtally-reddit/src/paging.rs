//! `after`-token pagination shared by search and listing collectors.

use crate::types::{Listing, PageRequest};

/// Largest page Reddit serves per listing request.
pub(crate) const MAX_PAGE_SIZE: usize = 100;

/// Tracks how far one underlying query has been paged.
///
/// A query is exhausted when the caller's limit is met, Reddit returns no
/// `after` token, or a page comes back empty.
#[derive(Debug, Clone)]
pub(crate) struct PageCursor {
    limit: Option<usize>,
    fetched: usize,
    after: Option<String>,
    started: bool,
    exhausted: bool,
}

impl PageCursor {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            fetched: 0,
            after: None,
            started: false,
            exhausted: false,
        }
    }

    /// The next page to request, or `None` once the query is exhausted.
    pub(crate) fn next_request(&self) -> Option<PageRequest> {
        if self.exhausted || (self.started && self.after.is_none()) {
            return None;
        }
        let size = match self.limit {
            Some(limit) => {
                let remaining = limit.saturating_sub(self.fetched);
                if remaining == 0 {
                    return None;
                }
                remaining.min(MAX_PAGE_SIZE)
            }
            None => MAX_PAGE_SIZE,
        };
        Some(PageRequest {
            limit: size,
            after: self.after.clone(),
        })
    }

    /// Record a fetched page and return its items, trimmed to the limit.
    pub(crate) fn advance<T>(&mut self, listing: Listing<T>) -> Vec<T> {
        let Listing { mut items, after } = listing;
        if let Some(limit) = self.limit {
            items.truncate(limit.saturating_sub(self.fetched));
        }
        self.started = true;
        self.fetched += items.len();
        self.exhausted = items.is_empty();
        self.after = after;
        items
    }
}
