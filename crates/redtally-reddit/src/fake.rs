//! Scripted in-memory [`RedditApi`] used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::RedditApi;
use crate::error::RedditError;
use crate::types::{Listing, PageRequest, RawItem, RawPost, SearchRequest, SearchSort};

/// 2024-03-01T00:00:00Z
pub(crate) const MARCH_FIRST_2024: f64 = 1_709_251_200.0;
const DAY_SECS: f64 = 86_400.0;

pub(crate) fn post(id: &str, title: &str, body: &str) -> RawPost {
    RawPost {
        id: id.to_string(),
        author: Some("tester".to_string()),
        subreddit: "testing".to_string(),
        created_utc: MARCH_FIRST_2024,
        title: title.to_string(),
        selftext: body.to_string(),
        permalink: format!("/r/testing/comments/{id}/"),
        url: format!("https://www.reddit.com/r/testing/comments/{id}/"),
        score: 1,
        num_comments: 0,
        upvote_ratio: 1.0,
    }
}

/// A post created `days` after 2024-03-01 (negative for earlier).
pub(crate) fn post_days_after(id: &str, title: &str, days: i32) -> RawPost {
    RawPost {
        created_utc: MARCH_FIRST_2024 + f64::from(days) * DAY_SECS,
        ..post(id, title, "")
    }
}

#[derive(Default)]
pub(crate) struct FakeReddit {
    search: HashMap<(String, String, SearchSort), Vec<RawPost>>,
    channel_new: HashMap<String, Vec<RawPost>>,
    author_new: HashMap<String, Vec<RawItem>>,
    failing_channel: Option<String>,
    search_calls: Mutex<Vec<(SearchRequest, PageRequest)>>,
    listing_calls: Mutex<Vec<String>>,
}

impl FakeReddit {
    pub(crate) fn with_search(
        mut self,
        query: &str,
        channel: &str,
        sort: SearchSort,
        posts: Vec<RawPost>,
    ) -> Self {
        self.search
            .insert((query.to_string(), channel.to_string(), sort), posts);
        self
    }

    pub(crate) fn with_channel_new(mut self, channel: &str, posts: Vec<RawPost>) -> Self {
        self.channel_new.insert(channel.to_string(), posts);
        self
    }

    pub(crate) fn with_author_new(mut self, author: &str, items: Vec<RawItem>) -> Self {
        self.author_new.insert(author.to_string(), items);
        self
    }

    /// Every request against `channel` fails with a 503.
    pub(crate) fn failing_search_on(mut self, channel: &str) -> Self {
        self.failing_channel = Some(channel.to_string());
        self
    }

    pub(crate) fn search_calls(&self) -> Vec<SearchRequest> {
        self.search_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub(crate) fn search_pages(&self) -> Vec<PageRequest> {
        self.search_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, page)| page.clone())
            .collect()
    }

    pub(crate) fn listing_calls(&self) -> Vec<String> {
        self.listing_calls.lock().unwrap().clone()
    }

    fn fail_if_scripted(&self, channel: &str) -> Result<(), RedditError> {
        if self.failing_channel.as_deref() == Some(channel) {
            return Err(RedditError::Status {
                status: 503,
                context: format!("fake({channel})"),
            });
        }
        Ok(())
    }
}

/// Serve `items` in pages, using the stringified offset as the `after` token.
fn paginate<T: Clone>(items: &[T], page: &PageRequest) -> Listing<T> {
    let start = page
        .after
        .as_deref()
        .and_then(|a| a.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (start + page.limit).min(items.len());
    let after = (end < items.len()).then(|| end.to_string());
    Listing {
        items: items[start..end].to_vec(),
        after,
    }
}

#[async_trait]
impl RedditApi for FakeReddit {
    async fn search(
        &self,
        request: &SearchRequest,
        page: &PageRequest,
    ) -> Result<Listing<RawPost>, RedditError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((request.clone(), page.clone()));
        self.fail_if_scripted(&request.channel)?;

        let key = (request.query.clone(), request.channel.clone(), request.sort);
        Ok(match self.search.get(&key) {
            Some(posts) => paginate(posts, page),
            None => Listing::last(Vec::new()),
        })
    }

    async fn channel_new(
        &self,
        channel: &str,
        page: &PageRequest,
    ) -> Result<Listing<RawPost>, RedditError> {
        self.listing_calls
            .lock()
            .unwrap()
            .push(format!("r/{channel}"));
        self.fail_if_scripted(channel)?;
        Ok(self
            .channel_new
            .get(channel)
            .map_or_else(|| Listing::last(Vec::new()), |posts| paginate(posts, page)))
    }

    async fn author_new(
        &self,
        author: &str,
        page: &PageRequest,
    ) -> Result<Listing<RawItem>, RedditError> {
        self.listing_calls
            .lock()
            .unwrap()
            .push(format!("u/{author}"));
        Ok(self
            .author_new
            .get(author)
            .map_or_else(|| Listing::last(Vec::new()), |items| paginate(items, page)))
    }
}
