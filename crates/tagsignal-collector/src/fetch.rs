//! Per-tag fetch: one search call mapped into normalized [`PostRecord`]s.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tagsignal_core::PostRecord;

use crate::client::SearchClient;
use crate::types::SearchResponse;

/// Hard per-call result ceiling of the recent-search tier in use. Requested
/// limits above this are silently capped, not rejected.
pub const MAX_RESULTS_PER_CALL: u32 = 10;

/// Parse a `YYYY-MM-DD` since-date string.
///
/// A malformed value is treated as absent (the API then applies its default
/// recency window) with a warning, rather than failing the run.
#[must_use]
pub fn parse_since_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(
                since = raw,
                "invalid since date, falling back to the API's default window"
            );
            None
        }
    }
}

/// Fetch posts for one tag, excluding reshares, since the given date.
///
/// Fetch failures are recoverable non-fatal events: any call-level error
/// (auth, rate limit, network, malformed body, API-reported errors) is
/// logged and yields an empty vec, so one tag's failure can never abort
/// sibling tags.
pub async fn fetch_tag_posts(
    client: &SearchClient,
    tag: &str,
    limit: u32,
    since: Option<NaiveDate>,
) -> Vec<PostRecord> {
    let query = format!("#{tag} -is:retweet");
    let max_results = limit.min(MAX_RESULTS_PER_CALL);
    let start_time = since
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt));

    match client.search_recent(&query, max_results, start_time).await {
        Ok(response) => {
            if !response.errors.is_empty() {
                for err in &response.errors {
                    tracing::warn!(
                        tag,
                        title = err.title.as_deref().unwrap_or("unknown"),
                        detail = err.detail.as_deref().unwrap_or(""),
                        "search API reported an error"
                    );
                }
                return Vec::new();
            }
            let records = map_response(response);
            tracing::info!(tag, count = records.len(), "retrieved posts");
            records
        }
        Err(e) => {
            tracing::warn!(tag, error = %e, "fetch failed, contributing no records");
            Vec::new()
        }
    }
}

/// Map a wire response into schema-complete records.
///
/// Every record carries all schema fields: missing metrics are 0, missing
/// entity lists are empty, and an author missing from the user expansion
/// becomes `"N/A"`. The post URL is constructed from username and id.
fn map_response(response: SearchResponse) -> Vec<PostRecord> {
    let SearchResponse { data, includes, .. } = response;
    let users: HashMap<String, String> = includes
        .users
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    data.into_iter()
        .map(|post| {
            let username = post
                .author_id
                .as_ref()
                .and_then(|id| users.get(id))
                .map_or("N/A", String::as_str)
                .to_string();
            let timestamp = post
                .created_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
            let url = format!("https://x.com/{username}/status/{}", post.id);

            PostRecord::builder(post.id)
                .username(username)
                .timestamp(timestamp)
                .content(post.text)
                .likes(post.public_metrics.like_count)
                .retweets(post.public_metrics.retweet_count)
                .replies(post.public_metrics.reply_count)
                .quote_count(post.public_metrics.quote_count)
                .mentions(
                    post.entities
                        .mentions
                        .into_iter()
                        .map(|m| m.username)
                        .collect(),
                )
                .hashtags(post.entities.hashtags.into_iter().map(|h| h.tag).collect())
                .url(url)
                .build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_date_accepts_iso_dates() {
        let date = parse_since_date("2025-06-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn parse_since_date_treats_malformed_as_absent() {
        assert!(parse_since_date("01/06/2025").is_none());
        assert!(parse_since_date("yesterday").is_none());
        assert!(parse_since_date("").is_none());
    }

    #[test]
    fn map_response_joins_usernames_and_builds_urls() {
        let json = r#"{
            "data": [{"id": "101", "text": "hi", "author_id": "9"}],
            "includes": {"users": [{"id": "9", "username": "trader"}]}
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let records = map_response(response);
        assert_eq!(records[0].username, "trader");
        assert_eq!(records[0].url, "https://x.com/trader/status/101");
    }

    #[test]
    fn map_response_defaults_unknown_author_to_na() {
        let json = r#"{"data": [{"id": "7", "text": "hi", "author_id": "404"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let records = map_response(response);
        assert_eq!(records[0].username, "N/A");
        assert_eq!(records[0].url, "https://x.com/N/A/status/7");
    }

    #[test]
    fn map_response_fills_schema_defaults_for_missing_fields() {
        let json = r#"{"data": [{"id": "7", "text": "hi"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let records = map_response(response);
        let record = &records[0];
        assert!(record.timestamp.is_none());
        assert_eq!(record.likes, 0);
        assert_eq!(record.retweets, 0);
        assert_eq!(record.replies, 0);
        assert_eq!(record.quote_count, 0);
        assert!(record.mentions.is_empty());
        assert!(record.hashtags.is_empty());
    }

    #[test]
    fn map_response_parses_timestamps_to_utc() {
        let json = r#"{"data": [{"id": "7", "text": "hi", "created_at": "2025-06-01T09:15:00+05:30"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let records = map_response(response);
        let ts = records[0].timestamp.unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 1, 3, 45, 0).unwrap());
    }
}
