//! Post collection for the tagsignal pipeline.
//!
//! Wraps the recent-search API behind a typed HTTP client, maps wire
//! responses into [`tagsignal_core::PostRecord`]s, and fans out one fetch
//! task per configured tag. A failing tag degrades to an empty contribution;
//! it never aborts sibling tags or the run.

pub mod client;
pub mod collect;
pub mod error;
pub mod fetch;
pub mod types;

pub use client::SearchClient;
pub use collect::collect_posts;
pub use error::CollectorError;
pub use fetch::{fetch_tag_posts, parse_since_date, MAX_RESULTS_PER_CALL};
