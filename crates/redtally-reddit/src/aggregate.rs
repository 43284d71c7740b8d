//! Per-game daily roll-ups of matched submissions.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use redtally_core::{join_channels, Game};
use serde::Serialize;

use crate::api::RedditApi;
use crate::error::RedditError;
use crate::record::SubmissionRecord;
use crate::search::SearchEngine;
use crate::types::SearchSort;

/// Summed metrics for one game on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationRecord {
    pub game_id: String,
    /// Day the summarized submissions were created.
    pub date: NaiveDate,
    pub submissions: u64,
    pub comments: u64,
    pub upvotes: i64,
    pub downvotes: i64,
    /// Day the aggregation ran.
    pub date_of_request: NaiveDate,
}

impl std::fmt::Display for AggregationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}: (submissions={},comments={},upvotes={},downvotes={})",
            self.game_id, self.date, self.submissions, self.comments, self.upvotes, self.downvotes
        )
    }
}

/// Every game's aggregate for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyAggregates {
    pub date: NaiveDate,
    pub records: Vec<AggregationRecord>,
}

/// Group records by creation date, keeping dates in first-seen order.
#[must_use]
pub fn bucket_by_date(records: Vec<SubmissionRecord>) -> Vec<(NaiveDate, Vec<SubmissionRecord>)> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut buckets: Vec<(NaiveDate, Vec<SubmissionRecord>)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.created).or_insert_with(|| {
            buckets.push((record.created, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(record);
    }

    buckets
}

/// Sum one bucket of records.
#[must_use]
pub fn summarize(
    game_id: &str,
    date: NaiveDate,
    records: &[SubmissionRecord],
    date_of_request: NaiveDate,
) -> AggregationRecord {
    AggregationRecord {
        game_id: game_id.to_string(),
        date,
        submissions: records.len() as u64,
        comments: records.iter().map(|r| r.comment_count).sum(),
        upvotes: records.iter().map(|r| r.score).sum(),
        downvotes: records.iter().map(|r| r.downvotes).sum(),
        date_of_request,
    }
}

/// One [`AggregationRecord`] per date bucket, in bucket order.
#[must_use]
pub fn aggregate(
    game_id: &str,
    buckets: &[(NaiveDate, Vec<SubmissionRecord>)],
    date_of_request: NaiveDate,
) -> Vec<AggregationRecord> {
    buckets
        .iter()
        .map(|(date, records)| summarize(game_id, *date, records, date_of_request))
        .collect()
}

/// Search every game's name and normalized URL across `channels` and roll the
/// matches up per day, ascending by date.
///
/// # Errors
///
/// Returns the first [`RedditError`] from any game's search; no partial
/// output is returned.
pub async fn aggregate_for_games<A, S>(
    engine: &SearchEngine<'_, A>,
    games: &[Game],
    channels: &[S],
    sort: Option<SearchSort>,
) -> Result<Vec<DailyAggregates>, RedditError>
where
    A: RedditApi + ?Sized,
    S: AsRef<str>,
{
    aggregate_for_games_as_of(Utc::now().date_naive(), engine, games, channels, sort).await
}

/// [`aggregate_for_games`] with an explicit request date.
///
/// # Errors
///
/// Returns the first [`RedditError`] from any game's search.
pub async fn aggregate_for_games_as_of<A, S>(
    date_of_request: NaiveDate,
    engine: &SearchEngine<'_, A>,
    games: &[Game],
    channels: &[S],
    sort: Option<SearchSort>,
) -> Result<Vec<DailyAggregates>, RedditError>
where
    A: RedditApi + ?Sized,
    S: AsRef<str>,
{
    let joined = join_channels(channels);
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut daily: Vec<DailyAggregates> = Vec::new();

    for game in games {
        let records = engine
            .search_terms(&game.search_terms(), &joined, sort)
            .collect_all()
            .await?;
        let matched = records.len();
        let buckets = bucket_by_date(records);

        tracing::info!(
            game = %game.id,
            submissions = matched,
            days = buckets.len(),
            "aggregated game mentions"
        );

        for record in aggregate(&game.id, &buckets, date_of_request) {
            let slot = *index.entry(record.date).or_insert_with(|| {
                daily.push(DailyAggregates {
                    date: record.date,
                    records: Vec::new(),
                });
                daily.len() - 1
            });
            daily[slot].records.push(record);
        }
    }

    daily.sort_by_key(|day| day.date);
    Ok(daily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{post, post_days_after, FakeReddit};
    use crate::types::RawPost;

    fn record(raw: RawPost) -> SubmissionRecord {
        SubmissionRecord::from_raw(raw).unwrap()
    }

    fn scored(id: &str, comments: u64, score: i64, ratio: f64) -> SubmissionRecord {
        record(RawPost {
            num_comments: comments,
            score,
            upvote_ratio: ratio,
            ..post(id, "", "")
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summarize_sums_bucket_metrics() {
        let records = vec![scored("a", 2, 10, 0.5), scored("b", 1, 4, 0.8)];
        let today = date(2024, 3, 5);

        let summary = summarize("celeste", date(2024, 3, 1), &records, today);

        assert_eq!(summary.submissions, 2);
        assert_eq!(summary.comments, 3);
        assert_eq!(summary.upvotes, 14);
        assert_eq!(summary.downvotes, 11);
        assert_eq!(summary.date_of_request, today);
        assert_eq!(
            summary.to_string(),
            "celeste/2024-03-01: (submissions=2,comments=3,upvotes=14,downvotes=11)"
        );
    }

    #[test]
    fn bucket_by_date_preserves_first_seen_order() {
        let records = vec![
            record(post_days_after("a", "", 2)),
            record(post_days_after("b", "", 0)),
            record(post_days_after("c", "", 2)),
        ];

        let buckets = bucket_by_date(records);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].0, date(2024, 3, 3));
        assert_eq!(buckets[0].1.len(), 2);
        assert_eq!(buckets[1].0, date(2024, 3, 1));
    }

    #[test]
    fn aggregate_emits_one_record_per_bucket() {
        let buckets = bucket_by_date(vec![
            record(post_days_after("a", "", 1)),
            record(post_days_after("b", "", 0)),
        ]);
        let out = aggregate("hades", &buckets, date(2024, 4, 1));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.game_id == "hades" && r.submissions == 1));
    }

    #[tokio::test]
    async fn games_are_merged_per_day_in_date_order() {
        let api = FakeReddit::default()
            .with_search(
                "\"celeste\"",
                "gaming+indiegaming",
                SearchSort::Relevance,
                vec![
                    post_days_after("c1", "Celeste", 3),
                    post_days_after("c2", "celeste again", 0),
                ],
            )
            .with_search(
                "\"celestegame.com\"",
                "gaming+indiegaming",
                SearchSort::Relevance,
                vec![
                    RawPost {
                        selftext: "see celestegame.com".to_string(),
                        ..post_days_after("c3", "link", 3)
                    },
                    post_days_after("c1", "Celeste celestegame.com", 3),
                ],
            )
            .with_search(
                "\"hades\"",
                "gaming+indiegaming",
                SearchSort::Relevance,
                vec![post_days_after("h1", "Hades II", 1)],
            );
        let engine = SearchEngine::new(&api);
        let games = vec![
            Game::new("celeste", "Celeste", Some("https://celestegame.com/".to_string())),
            Game::new("hades", "Hades", None),
        ];
        let today = date(2024, 3, 10);

        let daily = aggregate_for_games_as_of(
            today,
            &engine,
            &games,
            &["r/gaming", "indiegaming"],
            None,
        )
        .await
        .unwrap();

        let dates: Vec<NaiveDate> = daily.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 4)]
        );
        let march_fourth = &daily[2].records;
        assert_eq!(march_fourth.len(), 1);
        assert_eq!(march_fourth[0].game_id, "celeste");
        assert_eq!(march_fourth[0].submissions, 2, "c1 counted once across terms");
        assert_eq!(daily[1].records[0].game_id, "hades");
        assert!(daily
            .iter()
            .flat_map(|d| &d.records)
            .all(|r| r.date_of_request == today));

        // Hades has no URL, so only its name is searched.
        let hades_queries = api
            .search_calls()
            .iter()
            .filter(|c| c.query.contains("hades"))
            .count();
        assert_eq!(hades_queries, 1);
    }
}
