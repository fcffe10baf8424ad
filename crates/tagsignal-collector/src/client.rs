use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;

use crate::error::CollectorError;
use crate::types::SearchResponse;

/// HTTP client for the recent-search endpoint.
///
/// Maps auth failures (401/403), rate limiting (429), and other non-2xx
/// responses to typed errors. The base URL is configurable so tests can
/// point it at a local mock server.
pub struct SearchClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl SearchClient {
    /// Creates a `SearchClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g. invalid TLS config).
    pub fn new(
        base_url: &str,
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        })
    }

    /// Runs one recent-search call and returns the parsed response body.
    ///
    /// Requests `created_at`, `author_id`, `public_metrics`, and `entities`
    /// on each post plus the `author_id` expansion so usernames can be
    /// joined from `includes.users`. `start_time`, when present, is sent as
    /// ISO 8601 with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::Unauthorized`] — HTTP 401 or 403.
    /// - [`CollectorError::RateLimited`] — HTTP 429.
    /// - [`CollectorError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`CollectorError::Http`] — network, TLS, or timeout failure.
    /// - [`CollectorError::Deserialize`] — body is not the expected shape.
    pub async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<SearchResponse, CollectorError> {
        let url = format!("{}/2/tweets/search/recent", self.base_url);

        let mut request = self.client.get(&url).bearer_auth(&self.bearer_token).query(&[
            ("query", query.to_string()),
            ("max_results", max_results.to_string()),
            (
                "tweet.fields",
                "created_at,author_id,public_metrics,entities".to_string(),
            ),
            ("expansions", "author_id".to_string()),
        ]);
        if let Some(start) = start_time {
            request = request.query(&[(
                "start_time",
                start.to_rfc3339_opts(SecondsFormat::Secs, true),
            )]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CollectorError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(CollectorError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(CollectorError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CollectorError::Deserialize {
            context: url,
            source: e,
        })
    }
}
