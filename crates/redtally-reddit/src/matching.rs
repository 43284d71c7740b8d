//! Exact-substring matching applied after Reddit search.
//!
//! Reddit matches on stems, so a search for `"running"` can return posts that
//! only say `run`. These helpers restore literal, case-insensitive semantics.

use crate::record::SubmissionRecord;

/// Where a query was found in a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLocation {
    pub in_title: bool,
    pub in_body: bool,
}

impl MatchLocation {
    #[must_use]
    pub fn found(self) -> bool {
        self.in_title || self.in_body
    }
}

/// Report whether the lower-cased `query` occurs in `title` and/or `body`.
#[must_use]
pub fn match_location(query: &str, title: &str, body: &str) -> MatchLocation {
    let needle = query.to_lowercase();
    MatchLocation {
        in_title: title.to_lowercase().contains(&needle),
        in_body: body.to_lowercase().contains(&needle),
    }
}

/// True iff the record's title or body literally contains `query`, ignoring case.
#[must_use]
pub fn matches(query: &str, record: &SubmissionRecord) -> bool {
    match_location(query, &record.title, &record.body).found()
}
