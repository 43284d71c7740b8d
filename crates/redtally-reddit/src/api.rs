use async_trait::async_trait;

use crate::error::RedditError;
use crate::types::{Listing, PageRequest, RawItem, RawPost, SearchRequest};

/// The Reddit operations the collectors depend on.
///
/// Each call fetches exactly one page. Paging, dedup and filtering happen in
/// the callers; retries, if any, belong to the implementation.
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// Search within a subreddit (or `+`-joined subreddits).
    async fn search(
        &self,
        request: &SearchRequest,
        page: &PageRequest,
    ) -> Result<Listing<RawPost>, RedditError>;

    /// Newest submissions of a subreddit.
    async fn channel_new(
        &self,
        channel: &str,
        page: &PageRequest,
    ) -> Result<Listing<RawPost>, RedditError>;

    /// Newest submissions and comments of a user.
    async fn author_new(
        &self,
        author: &str,
        page: &PageRequest,
    ) -> Result<Listing<RawItem>, RedditError>;
}
