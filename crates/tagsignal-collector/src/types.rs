//! Wire types for the recent-search endpoint (`GET /2/tweets/search/recent`).
//!
//! ## Observed response shape
//!
//! - `data` is absent entirely (not an empty array) when a query matches
//!   nothing; `#[serde(default)]` covers that case.
//! - `errors` can appear alongside a `200` status for partial problems
//!   (e.g. an invalid operator); a body-level error means the page is not
//!   trustworthy and the fetcher discards it.
//! - `public_metrics` and `entities` are only present when requested via
//!   `tweet.fields`; individual counters inside `public_metrics` have been
//!   observed missing on very fresh posts, so every field defaults to 0.
//! - Author usernames are not on the tweet object; they arrive in
//!   `includes.users` via the `author_id` expansion and are joined by id.

use serde::Deserialize;

/// Top-level response from the recent-search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<WirePost>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<WireUser>,
}

#[derive(Debug, Deserialize)]
pub struct WireUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct WirePost {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub public_metrics: WireMetrics,
    #[serde(default)]
    pub entities: WireEntities,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireMetrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireEntities {
    #[serde(default)]
    pub hashtags: Vec<WireHashtag>,
    #[serde(default)]
    pub mentions: Vec<WireMention>,
}

#[derive(Debug, Deserialize)]
pub struct WireHashtag {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct WireMention {
    pub username: String,
}

/// Body-level error entry reported by the API, possibly alongside a 200.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_post() {
        let json = r#"{
            "data": [{
                "id": "101",
                "text": "Buy #nifty50 now",
                "created_at": "2025-06-01T09:15:00.000Z",
                "author_id": "9",
                "public_metrics": {
                    "retweet_count": 3,
                    "reply_count": 1,
                    "like_count": 50,
                    "quote_count": 1
                },
                "entities": {
                    "hashtags": [{"start": 4, "end": 12, "tag": "nifty50"}],
                    "mentions": [{"start": 0, "end": 3, "username": "friend"}]
                }
            }],
            "includes": {"users": [{"id": "9", "username": "trader", "name": "Trader"}]},
            "meta": {"result_count": 1}
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].public_metrics.like_count, 50);
        assert_eq!(response.data[0].entities.hashtags[0].tag, "nifty50");
        assert_eq!(response.includes.users[0].username, "trader");
        assert!(response.errors.is_empty());
    }

    #[test]
    fn missing_optional_shapes_default() {
        let json = r#"{"data": [{"id": "7", "text": "hello"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let post = &response.data[0];
        assert!(post.created_at.is_none());
        assert!(post.author_id.is_none());
        assert_eq!(post.public_metrics.like_count, 0);
        assert!(post.entities.hashtags.is_empty());
        assert!(post.entities.mentions.is_empty());
    }

    #[test]
    fn empty_body_deserializes_to_empty_response() {
        let json = r#"{"meta": {"result_count": 0}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.data.is_empty());
        assert!(response.includes.users.is_empty());
    }

    #[test]
    fn body_level_errors_are_captured() {
        let json = r#"{"errors": [{"title": "Invalid Request", "detail": "bad operator"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].title.as_deref(), Some("Invalid Request"));
    }
}
