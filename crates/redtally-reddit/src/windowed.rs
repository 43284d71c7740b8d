//! Time-bounded listings of recent submissions.
//!
//! Listings are complete newest-first feeds rather than ranked search
//! results, so no sort cascade is needed; each listing is paged up to the
//! caller's limit and filtered by a date cutoff.

use std::collections::HashSet;

use chrono::{Days, NaiveDate, Utc};
use redtally_core::{normalize_channel, CollectionPeriod};

use crate::api::RedditApi;
use crate::error::RedditError;
use crate::paging::PageCursor;
use crate::record::SubmissionRecord;
use crate::types::{RawItem, RawPost};

/// Collects recent submissions per subreddit or per author.
pub struct WindowedFetcher<'a, A: ?Sized> {
    api: &'a A,
}

/// Dedup and cutoff state for one fetch call.
struct WindowCollector {
    cutoff: NaiveDate,
    seen: HashSet<String>,
    records: Vec<SubmissionRecord>,
}

impl WindowCollector {
    fn new(today: NaiveDate, period: CollectionPeriod) -> Self {
        let days = u64::try_from(period.days()).unwrap_or_default();
        Self {
            cutoff: today - Days::new(days),
            seen: HashSet::new(),
            records: Vec::new(),
        }
    }

    fn offer(&mut self, post: RawPost) {
        if !self.seen.insert(post.id.clone()) {
            return;
        }
        let id = post.id.clone();
        match SubmissionRecord::from_raw(post) {
            Some(record) if record.created > self.cutoff => self.records.push(record),
            Some(_) => {}
            None => tracing::warn!(id = %id, "skipping post with unrepresentable timestamp"),
        }
    }
}

impl<'a, A: RedditApi + ?Sized> WindowedFetcher<'a, A> {
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Newest submissions of each subreddit created within `period` of today.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`] from a listing request.
    pub async fn fetch_new_in_channels<S: AsRef<str>>(
        &self,
        channels: &[S],
        period: CollectionPeriod,
        limit: Option<usize>,
    ) -> Result<Vec<SubmissionRecord>, RedditError> {
        self.fetch_new_in_channels_as_of(Utc::now().date_naive(), channels, period, limit)
            .await
    }

    /// [`Self::fetch_new_in_channels`] with an explicit reference date.
    ///
    /// Keeps records created strictly after `today - period`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`] from a listing request.
    pub async fn fetch_new_in_channels_as_of<S: AsRef<str>>(
        &self,
        today: NaiveDate,
        channels: &[S],
        period: CollectionPeriod,
        limit: Option<usize>,
    ) -> Result<Vec<SubmissionRecord>, RedditError> {
        let mut collector = WindowCollector::new(today, period);

        for channel in channels {
            let channel = normalize_channel(channel.as_ref());
            if channel.is_empty() {
                continue;
            }
            let mut cursor = PageCursor::new(limit);
            while let Some(page) = cursor.next_request() {
                let listing = self.api.channel_new(&channel, &page).await?;
                for post in cursor.advance(listing) {
                    collector.offer(post);
                }
            }
        }

        tracing::info!(
            period = %period,
            cutoff = %collector.cutoff,
            seen = collector.seen.len(),
            kept = collector.records.len(),
            "collected new submissions in subreddits"
        );
        Ok(collector.records)
    }

    /// Newest submissions of each author created within `period` of today.
    /// Comments in the authors' histories are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`] from a listing request.
    pub async fn fetch_new_by_authors<S: AsRef<str>>(
        &self,
        authors: &[S],
        period: CollectionPeriod,
        limit: Option<usize>,
    ) -> Result<Vec<SubmissionRecord>, RedditError> {
        self.fetch_new_by_authors_as_of(Utc::now().date_naive(), authors, period, limit)
            .await
    }

    /// [`Self::fetch_new_by_authors`] with an explicit reference date.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedditError`] from a listing request.
    pub async fn fetch_new_by_authors_as_of<S: AsRef<str>>(
        &self,
        today: NaiveDate,
        authors: &[S],
        period: CollectionPeriod,
        limit: Option<usize>,
    ) -> Result<Vec<SubmissionRecord>, RedditError> {
        let mut collector = WindowCollector::new(today, period);
        let mut comments = 0usize;

        for author in authors {
            let author = author.as_ref().trim();
            if author.is_empty() {
                continue;
            }
            let mut cursor = PageCursor::new(limit);
            while let Some(page) = cursor.next_request() {
                let listing = self.api.author_new(author, &page).await?;
                for item in cursor.advance(listing) {
                    match item {
                        RawItem::Post(post) => collector.offer(post),
                        RawItem::Comment { .. } => comments += 1,
                    }
                }
            }
        }

        tracing::info!(
            period = %period,
            cutoff = %collector.cutoff,
            skipped_comments = comments,
            kept = collector.records.len(),
            "collected new submissions by authors"
        );
        Ok(collector.records)
    }
}
