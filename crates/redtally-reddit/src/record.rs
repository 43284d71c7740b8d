//! Normalized submission records.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::types::RawPost;

/// Snapshot of a Reddit submission at fetch time.
///
/// Built from a [`RawPost`] by [`SubmissionRecord::from_raw`]; nothing from
/// the transport layer is reachable through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub author: Option<String>,
    pub channel: String,
    /// UTC calendar date the submission was created.
    pub created: NaiveDate,
    pub title: String,
    pub body: String,
    pub internal_url: String,
    pub external_url: String,
    pub score: i64,
    pub comment_count: u64,
    pub upvote_ratio: f64,
    pub downvotes: i64,
}

impl SubmissionRecord {
    /// Convert a raw post. Returns `None` when `created_utc` is outside the
    /// range chrono can represent.
    #[must_use]
    pub fn from_raw(raw: RawPost) -> Option<Self> {
        #[allow(clippy::cast_possible_truncation)]
        let created = DateTime::from_timestamp(raw.created_utc.floor() as i64, 0)?.date_naive();
        let downvotes = estimate_downvotes(raw.score, raw.upvote_ratio);

        Some(Self {
            id: raw.id,
            author: raw.author,
            channel: raw.subreddit,
            created,
            title: raw.title,
            body: raw.selftext,
            internal_url: raw.permalink,
            external_url: raw.url,
            score: raw.score,
            comment_count: raw.num_comments,
            upvote_ratio: raw.upvote_ratio,
            downvotes,
        })
    }
}

impl std::fmt::Display for SubmissionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.author.as_deref().unwrap_or("[deleted]"),
            self.channel,
            self.created,
            self.title
        )
    }
}

/// Estimate downvotes from score and upvote ratio: `floor(score / ratio) - score`.
///
/// Reddit exposes neither raw count, so a zero ratio yields `0`. Near a ratio
/// of 1 the truncation can produce off-by-one or negative values; these are
/// passed through as-is.
#[must_use]
pub fn estimate_downvotes(score: i64, upvote_ratio: f64) -> i64 {
    if upvote_ratio == 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let total = (score as f64 / upvote_ratio).floor() as i64;
    total - score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(score: i64, upvote_ratio: f64) -> RawPost {
        RawPost {
            id: "t3abc".to_string(),
            author: Some("someone".to_string()),
            subreddit: "gaming".to_string(),
            created_utc: 1_709_294_399.9,
            title: "Title".to_string(),
            selftext: "Body".to_string(),
            permalink: "/r/gaming/comments/t3abc/title/".to_string(),
            url: "https://example.com/".to_string(),
            score,
            num_comments: 4,
            upvote_ratio,
        }
    }

    #[test]
    fn zero_ratio_yields_zero_downvotes() {
        assert_eq!(estimate_downvotes(57, 0.0), 0);
    }

    #[test]
    fn downvotes_follow_floor_formula() {
        assert_eq!(estimate_downvotes(10, 0.5), 10);
        assert_eq!(estimate_downvotes(4, 0.8), 1);
        assert_eq!(estimate_downvotes(7, 0.9), 0);
    }

    #[test]
    fn negative_scores_floor_downwards() {
        // -3 / 0.4 = -7.5 -> -8
        assert_eq!(estimate_downvotes(-3, 0.4), -5);
    }

    #[allow(clippy::float_cmp)]
    #[test]
    fn from_raw_truncates_timestamp_to_utc_date() {
        let record = SubmissionRecord::from_raw(raw(10, 0.5)).unwrap();
        assert_eq!(record.created, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(record.downvotes, 10);
        assert_eq!(record.channel, "gaming");
        assert_eq!(record.body, "Body");
        assert_eq!(record.internal_url, "/r/gaming/comments/t3abc/title/");
        assert_eq!(record.upvote_ratio, 0.5);
        assert_eq!(record.to_string(), "someone|gaming|2024-03-01|Title");
    }

    #[test]
    fn from_raw_rejects_unrepresentable_timestamp() {
        let mut post = raw(1, 1.0);
        post.created_utc = 1e20;
        assert!(SubmissionRecord::from_raw(post).is_none());
    }
}
