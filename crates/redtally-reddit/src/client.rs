//! Reddit API client (client-credentials OAuth).

use std::time::Duration;

use async_trait::async_trait;
use redtally_core::AppConfig;
use reqwest::Client;
use serde::Deserialize;

use crate::api::RedditApi;
use crate::error::RedditError;
use crate::retry::retry_with_backoff;
use crate::types::{
    Listing, ListingEnvelope, PageRequest, RawItem, RawPost, SearchRequest, Thing,
};

const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit API client with a valid access token.
///
/// The token is exchanged once at construction and reused for every request
/// made through this client.
pub struct RedditClient {
    client: Client,
    token: String,
    api_base: String,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl RedditClient {
    /// Create a client against the production endpoints by exchanging client
    /// credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the HTTP client cannot be built or the
    /// token request fails, and [`RedditError::Auth`] if Reddit rejects the
    /// credentials.
    pub async fn new(config: &AppConfig) -> Result<Self, RedditError> {
        Self::with_base_urls(config, DEFAULT_API_BASE, DEFAULT_TOKEN_URL).await
    }

    /// Create a client with custom endpoints (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`RedditClient::new`].
    pub async fn with_base_urls(
        config: &AppConfig,
        api_base: &str,
        token_url: &str,
    ) -> Result<Self, RedditError> {
        // oauth.reddit.com sometimes blocks rustls via TLS fingerprinting.
        // If rejected, enable `native-tls` on reqwest and call `.use_native_tls()`.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.reddit_user_agent.as_str())
            .build()?;

        let token = Self::fetch_token(
            &client,
            token_url,
            &config.reddit_client_id,
            &config.reddit_client_secret,
        )
        .await?;

        Ok(Self {
            client,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    async fn fetch_token(
        client: &Client,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, RedditError> {
        let response = client
            .post(token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RedditError::Auth(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| RedditError::Auth(format!("token parse error: {e}")))?;

        Ok(token_resp.access_token)
    }

    /// GET a listing endpoint, retrying transient failures, and return its children.
    async fn get_listing(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
        page: &PageRequest,
        context: &str,
    ) -> Result<(Vec<Thing>, Option<String>), RedditError> {
        params.push(("limit", page.limit.to_string()));
        params.push(("raw_json", "1".to_string()));
        if let Some(cursor) = &page.after {
            params.push(("after", cursor.clone()));
        }

        let endpoint = format!("{}{path}", self.api_base);
        let body = retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            self.request_json(&endpoint, &params, context)
        })
        .await?;

        let envelope: ListingEnvelope =
            serde_json::from_value(body).map_err(|e| RedditError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;

        tracing::debug!(
            endpoint = %endpoint,
            children = envelope.data.children.len(),
            has_more = envelope.data.after.is_some(),
            "fetched Reddit listing page"
        );

        Ok((envelope.data.children, envelope.data.after))
    }

    async fn request_json(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
        context: &str,
    ) -> Result<serde_json::Value, RedditError> {
        let response = self
            .client
            .get(endpoint)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            return Err(RedditError::RateLimited {
                context: context.to_string(),
                retry_after_secs,
            });
        }
        if !status.is_success() {
            return Err(RedditError::Status {
                status: status.as_u16(),
                context: context.to_string(),
            });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}

/// Keep the `t3` children of a listing, skipping anything that fails to parse.
fn posts_from_things(things: Vec<Thing>) -> Vec<RawPost> {
    things
        .into_iter()
        .filter(|thing| thing.kind == "t3")
        .filter_map(parse_post)
        .collect()
}

fn parse_post(thing: Thing) -> Option<RawPost> {
    serde_json::from_value::<RawPost>(thing.data)
        .map_err(|e| {
            tracing::warn!(error = %e, "skipping malformed Reddit post");
        })
        .ok()
}

/// Split a user history listing into posts and comments; other kinds are dropped.
fn items_from_things(things: Vec<Thing>) -> Vec<RawItem> {
    things
        .into_iter()
        .filter_map(|thing| match thing.kind.as_str() {
            "t3" => parse_post(thing).map(RawItem::Post),
            "t1" => {
                let id = thing.data.get("id")?.as_str()?.to_string();
                Some(RawItem::Comment { id })
            }
            _ => None,
        })
        .collect()
}

#[async_trait]
impl RedditApi for RedditClient {
    async fn search(
        &self,
        request: &SearchRequest,
        page: &PageRequest,
    ) -> Result<Listing<RawPost>, RedditError> {
        let params = vec![
            ("q", request.query.clone()),
            ("restrict_sr", "true".to_string()),
            ("sort", request.sort.as_str().to_string()),
            ("t", request.time_window.as_str().to_string()),
            ("type", "link".to_string()),
        ];
        let path = format!("/r/{}/search", request.channel);
        let context = format!("search(r/{}, sort={})", request.channel, request.sort);
        let (things, after) = self.get_listing(&path, params, page, &context).await?;

        Ok(Listing {
            items: posts_from_things(things),
            after,
        })
    }

    async fn channel_new(
        &self,
        channel: &str,
        page: &PageRequest,
    ) -> Result<Listing<RawPost>, RedditError> {
        let path = format!("/r/{channel}/new");
        let context = format!("new(r/{channel})");
        let (things, after) = self.get_listing(&path, Vec::new(), page, &context).await?;

        Ok(Listing {
            items: posts_from_things(things),
            after,
        })
    }

    async fn author_new(
        &self,
        author: &str,
        page: &PageRequest,
    ) -> Result<Listing<RawItem>, RedditError> {
        let path = format!("/user/{author}/overview");
        let context = format!("overview(u/{author})");
        let params = vec![("sort", "new".to_string())];
        let (things, after) = self.get_listing(&path, params, page, &context).await?;

        Ok(Listing {
            items: items_from_things(things),
            after,
        })
    }
}
