//! Row-level cleaning and two-pass deduplication.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tagsignal_core::{Dataset, PostRecord};

use crate::store::RawRow;

/// Result of cleaning raw rows.
///
/// `NoData` is the single explicit sentinel for "nothing to process": it
/// covers both an empty input and an input whose every row was dropped
/// during cleaning. An empty-but-valid `Dataset` is never returned with
/// that meaning, so the orchestrator has exactly one skip signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    NoData,
    Cleaned(Dataset),
}

/// Clean raw rows into a typed [`Dataset`].
///
/// Pure over its input; the only side effects are tracing diagnostics
/// counting rows removed at each stage. Steps, in order:
///
/// 1. Parse `timestamp` (RFC 3339); rows that fail to parse are dropped.
/// 2. Coerce each metric to a non-negative integer; unparseable values
///    become 0, the row is kept.
/// 3. Drop rows with empty `content` (content is the minimum viable
///    signal input).
/// 4. Deduplicate by `id`, first occurrence wins.
/// 5. Deduplicate by `(username, content)`, first occurrence wins.
///
/// The id pass runs first (cheap, exact); the pair pass then catches
/// re-submissions that lack matching ids. Cleaning already-cleaned data
/// removes nothing further.
#[must_use]
pub fn clean(rows: Vec<RawRow>) -> CleanOutcome {
    if rows.is_empty() {
        tracing::warn!("input is empty; no processing will be done");
        return CleanOutcome::NoData;
    }

    let initial = rows.len();
    let mut dropped_timestamp = 0usize;
    let mut dropped_content = 0usize;

    let mut records: Vec<PostRecord> = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(timestamp) = parse_timestamp(&row.timestamp) else {
            dropped_timestamp += 1;
            continue;
        };
        if row.content.trim().is_empty() {
            dropped_content += 1;
            continue;
        }
        records.push(PostRecord {
            id: row.id,
            username: row.username,
            timestamp: Some(timestamp),
            content: row.content,
            likes: coerce_metric(&row.likes),
            retweets: coerce_metric(&row.retweets),
            replies: coerce_metric(&row.replies),
            quote_count: coerce_metric(&row.quote_count),
            mentions: parse_list(&row.mentions),
            hashtags: parse_list(&row.hashtags),
            url: row.url,
        });
    }

    let before_id = records.len();
    let mut seen_ids: HashSet<String> = HashSet::new();
    records.retain(|r| seen_ids.insert(r.id.clone()));
    let dropped_id = before_id - records.len();

    let before_pair = records.len();
    let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
    records.retain(|r| seen_pairs.insert((r.username.clone(), r.content.clone())));
    let dropped_pair = before_pair - records.len();

    tracing::info!(
        initial,
        dropped_timestamp,
        dropped_content,
        dropped_id,
        dropped_pair,
        kept = records.len(),
        "cleaned raw rows"
    );

    if records.is_empty() {
        tracing::warn!("all rows dropped during cleaning; nothing to process");
        return CleanOutcome::NoData;
    }
    CleanOutcome::Cleaned(Dataset::new(records))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Coerce a metric cell to a non-negative integer; anything unparseable
/// (including negative values) becomes 0. Decimal renderings like "5.0"
/// are accepted since upstream tooling sometimes writes floats.
fn coerce_metric(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return n;
    }
    match trimmed.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(f) if f.is_finite() && f >= 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Entity-list cells are JSON arrays of strings; anything else parses to
/// an empty list.
fn parse_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
