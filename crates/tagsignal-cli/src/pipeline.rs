//! Pipeline orchestration: collect → persist raw → clean → score →
//! persist processed.
//!
//! "No data" at any stage — nothing collected, raw artifact missing, or
//! every row dropped in cleaning — is a logged terminal state with a
//! normal exit; a persistence failure propagates and the process exits
//! non-zero.

use std::path::Path;

use anyhow::Context;

use tagsignal_collector::{collect_posts, parse_since_date, SearchClient};
use tagsignal_core::{load_app_config, AppConfig};
use tagsignal_process::{
    clean, generate_signals, load_raw_csv, write_raw_csv, write_signals_parquet, CleanOutcome,
    ProcessError,
};

pub async fn run() -> anyhow::Result<()> {
    let config = load_app_config()?;
    tracing::info!(?config, "starting pipeline run");

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

    let client = SearchClient::new(
        &config.api_base_url,
        &config.bearer_token,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let since_override = config.since_date.as_deref().and_then(parse_since_date);

    let dataset = collect_posts(
        &client,
        &config.tags,
        per_tag_limit(&config),
        config.lookback_days,
        since_override,
    )
    .await;

    if dataset.is_empty() {
        tracing::info!("no data collected; skipping processing and persistence");
        return Ok(());
    }

    write_raw_csv(&config.raw_path, &dataset)?;

    process_raw(&config.raw_path, &config.processed_path)
}

/// Clean, score, and persist the processed artifact from the raw CSV.
///
/// A missing raw artifact is the "no data" case: logged, remaining stages
/// skipped, normal exit. Every other load or write error propagates.
fn process_raw(raw_path: &Path, processed_path: &Path) -> anyhow::Result<()> {
    let rows = match load_raw_csv(raw_path) {
        Ok(rows) => rows,
        Err(ProcessError::InputNotFound { path }) => {
            tracing::warn!(path, "raw artifact missing; no data to process");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let dataset = match clean(rows) {
        CleanOutcome::NoData => {
            tracing::warn!("no rows survived cleaning; skipping signal generation");
            return Ok(());
        }
        CleanOutcome::Cleaned(dataset) => dataset,
    };

    let scored = generate_signals(dataset);
    write_signals_parquet(processed_path, &scored)?;

    tracing::info!(rows = scored.len(), "pipeline run complete");
    Ok(())
}

/// Split the informational overall target evenly across tags. The per-call
/// ceiling inside the fetcher is what actually bounds fetch volume.
fn per_tag_limit(config: &AppConfig) -> u32 {
    let tags = config.tags.len().max(1);
    u32::try_from(config.total_post_target / tags)
        .unwrap_or(u32::MAX)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tagsignal_core::{Dataset, PostRecord};

    #[test]
    fn missing_raw_artifact_is_no_data_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw_posts.csv");
        let processed_path = dir.path().join("signals.parquet");

        let result = process_raw(&raw_path, &processed_path);

        assert!(result.is_ok(), "expected normal exit, got: {result:?}");
        assert!(
            !processed_path.exists(),
            "no processed artifact may be written when input is missing"
        );
    }

    #[test]
    fn raw_artifact_with_only_unusable_rows_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw_posts.csv");
        let processed_path = dir.path().join("signals.parquet");

        // No timestamp: every row is dropped during cleaning.
        let dataset = Dataset::new(vec![PostRecord::builder("1").content("hello").build()]);
        write_raw_csv(&raw_path, &dataset).unwrap();

        let result = process_raw(&raw_path, &processed_path);

        assert!(result.is_ok(), "expected normal exit, got: {result:?}");
        assert!(!processed_path.exists());
    }

    #[test]
    fn usable_raw_artifact_produces_the_processed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw_posts.csv");
        let processed_path = dir.path().join("signals.parquet");

        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 9, 15, 0).unwrap();
        let dataset = Dataset::new(vec![PostRecord::builder("101")
            .username("trader")
            .timestamp(Some(ts))
            .content("buy nifty")
            .likes(5)
            .build()]);
        write_raw_csv(&raw_path, &dataset).unwrap();

        let result = process_raw(&raw_path, &processed_path);

        assert!(result.is_ok(), "expected success, got: {result:?}");
        assert!(processed_path.exists());
    }
}
