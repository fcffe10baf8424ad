use std::path::PathBuf;

/// Runtime configuration for one pipeline run, loaded from environment
/// variables by [`crate::config::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    /// Bearer token for the post-search API. Supplied via
    /// `TAGSIGNAL_BEARER_TOKEN`; never compiled in.
    pub bearer_token: String,
    /// Hashtags to track, without the `#` prefix.
    pub tags: Vec<String>,
    /// Overall target post count for a run. Informational: the per-call
    /// ceiling enforced by the fetcher is what actually bounds volume.
    pub total_post_target: usize,
    /// Lookback window in days for the shared `since` date.
    pub lookback_days: i64,
    /// Optional `YYYY-MM-DD` override for the shared `since` date. When set
    /// (and well-formed) it replaces the lookback-derived date.
    pub since_date: Option<String>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub data_dir: PathBuf,
    pub raw_path: PathBuf,
    pub processed_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bearer_token", &"[redacted]")
            .field("tags", &self.tags)
            .field("total_post_target", &self.total_post_target)
            .field("lookback_days", &self.lookback_days)
            .field("since_date", &self.since_date)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("data_dir", &self.data_dir)
            .field("raw_path", &self.raw_path)
            .field("processed_path", &self.processed_path)
            .finish()
    }
}
