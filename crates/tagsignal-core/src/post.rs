//! The post record schema shared by every pipeline stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names of the persisted tabular artifacts, in fixed order.
///
/// Both the raw CSV and the processed Parquet artifact expose exactly these
/// columns (the Parquet artifact appends the derived signal columns after
/// them). An empty dataset still carries this schema.
pub const SCHEMA_COLUMNS: [&str; 11] = [
    "id",
    "username",
    "timestamp",
    "content",
    "likes",
    "retweets",
    "replies",
    "quote_count",
    "mentions",
    "hashtags",
    "url",
];

/// One social-media post, normalized to the fixed schema.
///
/// `id` is the primary uniqueness key; `(username, content)` is the
/// secondary key, guarding against re-posted content scraped without a
/// reliable id. Records are immutable once merged into a [`Dataset`];
/// downstream stages annotate rather than mutate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub username: String,
    /// `None` when the source timestamp was absent or unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    pub content: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub quote_count: u64,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub url: String,
}

impl PostRecord {
    /// Start building a record from its external id, with every other field
    /// at its schema default.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> PostRecordBuilder {
        PostRecordBuilder {
            record: PostRecord {
                id: id.into(),
                username: String::new(),
                timestamp: None,
                content: String::new(),
                likes: 0,
                retweets: 0,
                replies: 0,
                quote_count: 0,
                mentions: Vec::new(),
                hashtags: Vec::new(),
                url: String::new(),
            },
        }
    }
}

/// Builder that fills schema defaults for any field absent from a source:
/// zero metrics, empty entity lists, empty strings, no timestamp.
#[derive(Debug)]
pub struct PostRecordBuilder {
    record: PostRecord,
}

impl PostRecordBuilder {
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.record.username = username.into();
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.record.content = content.into();
        self
    }

    #[must_use]
    pub fn likes(mut self, likes: u64) -> Self {
        self.record.likes = likes;
        self
    }

    #[must_use]
    pub fn retweets(mut self, retweets: u64) -> Self {
        self.record.retweets = retweets;
        self
    }

    #[must_use]
    pub fn replies(mut self, replies: u64) -> Self {
        self.record.replies = replies;
        self
    }

    #[must_use]
    pub fn quote_count(mut self, quote_count: u64) -> Self {
        self.record.quote_count = quote_count;
        self
    }

    #[must_use]
    pub fn mentions(mut self, mentions: Vec<String>) -> Self {
        self.record.mentions = mentions;
        self
    }

    #[must_use]
    pub fn hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.record.hashtags = hashtags;
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.record.url = url.into();
        self
    }

    #[must_use]
    pub fn build(self) -> PostRecord {
        self.record
    }
}

/// Ordered collection of [`PostRecord`]s sharing the fixed column schema.
///
/// Produced once by the collector and exclusively owned by the sequential
/// stages that follow; there is no concurrent mutation after the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<PostRecord>,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<PostRecord>) -> Self {
        Self { records }
    }

    /// An empty dataset. The schema is carried by the type, so this is
    /// never schema-less.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn records(&self) -> &[PostRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PostRecord> {
        self.records
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = PostRecord>) {
        self.records.extend(records);
    }
}
