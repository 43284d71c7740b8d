//! Retry with exponential back-off and jitter for the Reddit client.
//!
//! Only the HTTP transport retries. The search and listing collectors above
//! it see a single final outcome per page.

use std::future::Future;
use std::time::Duration;

use crate::error::RedditError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** other statuses, auth failures and malformed bodies.
pub(crate) fn is_retriable(err: &RedditError) -> bool {
    match err {
        RedditError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        RedditError::RateLimited { .. } => true,
        RedditError::Status { status, .. } => *status >= 500,
        RedditError::Auth(_) | RedditError::Deserialize { .. } => false,
    }
}

/// Delay before retry number `attempt` (1-based).
///
/// A `Retry-After` hint on a 429 is used as given. Everything else doubles
/// from `backoff_base_ms` with ±25 % jitter. Both are capped at 60 s.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn backoff_delay_ms(err: &RedditError, attempt: u32, backoff_base_ms: u64) -> u64 {
    if let RedditError::RateLimited {
        retry_after_secs: Some(secs),
        ..
    } = err
    {
        return secs.saturating_mul(1000).min(MAX_DELAY_MS);
    }

    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, RedditError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RedditError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => err,
            Err(err) => return Err(err),
        };

        attempt += 1;
        let delay_ms = backoff_delay_ms(&err, attempt, backoff_base_ms);
        if matches!(err, RedditError::RateLimited { .. }) {
            tracing::warn!(attempt, max_retries, delay_ms, "Reddit rate limit hit, waiting");
        } else {
            tracing::warn!(
                attempt,
                max_retries,
                delay_ms,
                error = %err,
                "Reddit transient error, retrying after back-off"
            );
        }
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
