//! Concurrent collection: one fetch task per tag, join-all, merge.

use chrono::{Duration, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use tagsignal_core::{Dataset, PostRecord};

use crate::client::SearchClient;
use crate::fetch::fetch_tag_posts;

/// Collect posts for every tag concurrently and merge them into one
/// [`Dataset`].
///
/// One task is launched per tag (bounded parallelism equals the tag count)
/// and all tasks are joined before returning — no streaming, no early exit,
/// no cancellation. Every task shares the same `since` date, computed once
/// at collection start from `lookback_days`, so all tags cover the same
/// temporal window within a run.
///
/// Merge order is task completion order. A failing tag contributes zero
/// records without stopping siblings, so k of n tags failing still yields
/// the records of the n−k that succeeded. An empty tag set (or an all-failed
/// run) returns an empty `Dataset` that still carries the full schema.
///
/// `since_override` replaces the lookback-derived date when set (operators
/// pass it as a `YYYY-MM-DD` string via [`crate::parse_since_date`], which
/// already treats malformed input as absent).
pub async fn collect_posts(
    client: &SearchClient,
    tags: &[String],
    limit_per_tag: u32,
    lookback_days: i64,
    since_override: Option<NaiveDate>,
) -> Dataset {
    if tags.is_empty() {
        tracing::warn!("no tags configured; returning empty dataset");
        return Dataset::empty();
    }

    let since = since_override.unwrap_or_else(|| since_date(lookback_days));
    tracing::info!(
        tag_count = tags.len(),
        %since,
        limit_per_tag,
        "starting concurrent collection"
    );

    let per_tag: Vec<(&str, Vec<PostRecord>)> = stream::iter(tags)
        .map(|tag| async move {
            let records = fetch_tag_posts(client, tag, limit_per_tag, Some(since)).await;
            (tag.as_str(), records)
        })
        .buffer_unordered(tags.len())
        .collect()
        .await;

    let mut dataset = Dataset::empty();
    for (tag, records) in per_tag {
        tracing::debug!(tag, count = records.len(), "merging tag results");
        dataset.extend(records);
    }

    tracing::info!(total = dataset.len(), "collection complete");
    dataset
}

/// Shared since-date for a run: today (UTC) minus the lookback window.
fn since_date(lookback_days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(lookback_days)
}
