//! Artifact persistence: raw CSV (row-oriented, human-readable) and
//! processed Parquet (columnar), both written as full overwrites once per
//! run.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{Float64Array, Int64Array, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use chrono::SecondsFormat;
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};
use tagsignal_core::{Dataset, PostRecord, SCHEMA_COLUMNS};

use crate::error::ProcessError;
use crate::signal::ScoredRecord;

/// String-typed row shape of the raw CSV artifact.
///
/// Field order matches [`tagsignal_core::SCHEMA_COLUMNS`]; the csv crate
/// derives the header row from these field names. Type coercion back into
/// [`PostRecord`] happens in [`crate::clean`]. Entity-list cells are JSON
/// arrays of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub id: String,
    pub username: String,
    pub timestamp: String,
    pub content: String,
    pub likes: String,
    pub retweets: String,
    pub replies: String,
    pub quote_count: String,
    pub mentions: String,
    pub hashtags: String,
    pub url: String,
}

impl RawRow {
    /// Render a typed record into its CSV row shape. A missing timestamp
    /// becomes an empty cell (which `clean` later drops).
    #[must_use]
    pub fn from_record(record: &PostRecord) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            timestamp: record
                .timestamp
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            content: record.content.clone(),
            likes: record.likes.to_string(),
            retweets: record.retweets.to_string(),
            replies: record.replies.to_string(),
            quote_count: record.quote_count.to_string(),
            mentions: json_list(&record.mentions),
            hashtags: json_list(&record.hashtags),
            url: record.url.clone(),
        }
    }
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Write the raw artifact: one CSV row per record, header row first, full
/// overwrite.
///
/// The header is written explicitly from [`SCHEMA_COLUMNS`] so even an
/// empty dataset persists with the full schema present.
///
/// # Errors
///
/// Returns [`ProcessError::Csv`] or [`ProcessError::Io`] if the file
/// cannot be written.
pub fn write_raw_csv(path: &Path, dataset: &Dataset) -> Result<(), ProcessError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    writer
        .write_record(SCHEMA_COLUMNS)
        .map_err(|e| csv_err(path, e))?;
    for record in dataset.records() {
        writer
            .serialize(RawRow::from_record(record))
            .map_err(|e| csv_err(path, e))?;
    }
    writer.flush().map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "raw artifact written");
    Ok(())
}

/// Load the raw artifact back as string-typed rows.
///
/// Individual unreadable rows are skipped with a warning; a missing file
/// is the input-not-found case the orchestrator treats as "no data".
///
/// # Errors
///
/// - [`ProcessError::InputNotFound`] — no file at `path`.
/// - [`ProcessError::Csv`] — the file exists but cannot be opened as CSV.
pub fn load_raw_csv(path: &Path) -> Result<Vec<RawRow>, ProcessError> {
    if !path.exists() {
        return Err(ProcessError::InputNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable CSV row"),
        }
    }
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded raw rows");
    Ok(rows)
}

/// Write the processed artifact: the 11 schema columns plus the 4 derived
/// signal columns, as one Parquet record batch.
///
/// # Errors
///
/// Returns [`ProcessError::Io`], [`ProcessError::Arrow`], or
/// [`ProcessError::Parquet`] if the batch cannot be built or written.
pub fn write_signals_parquet(path: &Path, scored: &[ScoredRecord]) -> Result<(), ProcessError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("username", DataType::Utf8, false),
        Field::new("timestamp", DataType::Utf8, true),
        Field::new("content", DataType::Utf8, false),
        Field::new("likes", DataType::UInt64, false),
        Field::new("retweets", DataType::UInt64, false),
        Field::new("replies", DataType::UInt64, false),
        Field::new("quote_count", DataType::UInt64, false),
        Field::new("mentions", DataType::Utf8, false),
        Field::new("hashtags", DataType::Utf8, false),
        Field::new("url", DataType::Utf8, false),
        Field::new("cleaned_content", DataType::Utf8, false),
        Field::new("sentiment_score", DataType::Int64, false),
        Field::new("engagement_score", DataType::Float64, false),
        Field::new("composite_signal", DataType::Float64, false),
    ]));

    let ids = StringArray::from(collect_strs(scored, |s| s.post.id.as_str()));
    let usernames = StringArray::from(collect_strs(scored, |s| s.post.username.as_str()));
    let timestamps = StringArray::from(
        scored
            .iter()
            .map(|s| {
                s.post
                    .timestamp
                    .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            })
            .collect::<Vec<_>>(),
    );
    let contents = StringArray::from(collect_strs(scored, |s| s.post.content.as_str()));
    let likes = UInt64Array::from(scored.iter().map(|s| s.post.likes).collect::<Vec<_>>());
    let retweets = UInt64Array::from(scored.iter().map(|s| s.post.retweets).collect::<Vec<_>>());
    let replies = UInt64Array::from(scored.iter().map(|s| s.post.replies).collect::<Vec<_>>());
    let quote_counts =
        UInt64Array::from(scored.iter().map(|s| s.post.quote_count).collect::<Vec<_>>());
    let mentions = StringArray::from(
        scored
            .iter()
            .map(|s| json_list(&s.post.mentions))
            .collect::<Vec<_>>(),
    );
    let hashtags = StringArray::from(
        scored
            .iter()
            .map(|s| json_list(&s.post.hashtags))
            .collect::<Vec<_>>(),
    );
    let urls = StringArray::from(collect_strs(scored, |s| s.post.url.as_str()));
    let cleaned = StringArray::from(collect_strs(scored, |s| s.cleaned_content.as_str()));
    let sentiments =
        Int64Array::from(scored.iter().map(|s| s.sentiment_score).collect::<Vec<_>>());
    let engagements =
        Float64Array::from(scored.iter().map(|s| s.engagement_score).collect::<Vec<_>>());
    let composites =
        Float64Array::from(scored.iter().map(|s| s.composite_signal).collect::<Vec<_>>());

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(ids),
            Arc::new(usernames),
            Arc::new(timestamps),
            Arc::new(contents),
            Arc::new(likes),
            Arc::new(retweets),
            Arc::new(replies),
            Arc::new(quote_counts),
            Arc::new(mentions),
            Arc::new(hashtags),
            Arc::new(urls),
            Arc::new(cleaned),
            Arc::new(sentiments),
            Arc::new(engagements),
            Arc::new(composites),
        ],
    )
    .map_err(|e| ProcessError::Arrow {
        path: path.display().to_string(),
        source: e,
    })?;

    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).map_err(|e| parquet_err(path, e))?;
    writer.write(&batch).map_err(|e| parquet_err(path, e))?;
    writer.close().map_err(|e| parquet_err(path, e))?;
    tracing::info!(path = %path.display(), rows = scored.len(), "processed artifact written");
    Ok(())
}

fn collect_strs<'a, F>(scored: &'a [ScoredRecord], f: F) -> Vec<&'a str>
where
    F: Fn(&'a ScoredRecord) -> &'a str,
{
    scored.iter().map(f).collect()
}

fn csv_err(path: &Path, source: csv::Error) -> ProcessError {
    ProcessError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn io_err(path: &Path, source: std::io::Error) -> ProcessError {
    ProcessError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn parquet_err(path: &Path, source: parquet::errors::ParquetError) -> ProcessError {
    ProcessError::Parquet {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::generate_signals;
    use chrono::{TimeZone, Utc};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tagsignal_core::SCHEMA_COLUMNS;

    fn sample_dataset() -> Dataset {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 9, 15, 0).unwrap();
        Dataset::new(vec![
            PostRecord::builder("101")
                .username("trader")
                .timestamp(Some(ts))
                .content("Buy #nifty50 now")
                .likes(50)
                .retweets(3)
                .replies(1)
                .quote_count(1)
                .mentions(vec!["friend".to_string()])
                .hashtags(vec!["nifty50".to_string()])
                .url("https://x.com/trader/status/101")
                .build(),
            PostRecord::builder("202")
                .username("bear")
                .timestamp(Some(ts))
                .content("sell everything")
                .build(),
        ])
    }

    #[test]
    fn raw_csv_round_trips_and_keeps_the_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_posts.csv");
        let dataset = sample_dataset();

        write_raw_csv(&path, &dataset).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, SCHEMA_COLUMNS.join(","));

        let rows = load_raw_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "101");
        assert_eq!(rows[0].timestamp, "2025-06-01T09:15:00Z");
        assert_eq!(rows[0].mentions, r#"["friend"]"#);
        assert_eq!(rows[1].likes, "0");
    }

    #[test]
    fn write_raw_csv_overwrites_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_posts.csv");
        write_raw_csv(&path, &sample_dataset()).unwrap();
        write_raw_csv(&path, &Dataset::empty()).unwrap();
        let rows = load_raw_csv(&path).unwrap();
        assert!(rows.is_empty(), "overwrite must not append");
    }

    #[test]
    fn load_raw_csv_missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let result = load_raw_csv(&path);
        assert!(
            matches!(result, Err(ProcessError::InputNotFound { .. })),
            "expected InputNotFound, got: {result:?}"
        );
    }

    #[test]
    fn parquet_artifact_carries_all_columns_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.parquet");
        let scored = generate_signals(sample_dataset());

        write_signals_parquet(&path, &scored).unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>().unwrap();
        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(rows, 2);

        let schema = batches[0].schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let mut expected: Vec<&str> = SCHEMA_COLUMNS.to_vec();
        expected.extend([
            "cleaned_content",
            "sentiment_score",
            "engagement_score",
            "composite_signal",
        ]);
        assert_eq!(names, expected);
    }
}
