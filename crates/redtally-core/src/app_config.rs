use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    pub log_level: String,
    pub games_path: PathBuf,
    /// Default subreddits, already stripped of any `r/` prefix.
    pub subreddits: Vec<String>,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Result count after which the search engine re-runs the remaining sorts.
    pub coverage_ceiling: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("reddit_client_id", &"[redacted]")
            .field("reddit_client_secret", &"[redacted]")
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("log_level", &self.log_level)
            .field("games_path", &self.games_path)
            .field("subreddits", &self.subreddits)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("coverage_ceiling", &self.coverage_ceiling)
            .finish()
    }
}
