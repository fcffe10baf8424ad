//! Text normalization, lexicon sentiment, and composite signal scoring.

use std::sync::LazyLock;

use regex::Regex;
use tagsignal_core::{Dataset, PostRecord};

/// Single-word bullish terms. "diamond hands" is two words and can never
/// match whitespace tokens; kept as-is, an accepted lexicon limitation.
pub const BULLISH_WORDS: &[&str] = &[
    "buy", "bullish", "long", "rally", "breakout", "uptrend", "strong", "growth", "profit", "up",
    "rocket", "moon", "diamond hands",
];

pub const BEARISH_WORDS: &[&str] = &[
    "sell", "bearish", "short", "crash", "downtrend", "weak", "loss", "down", "dump", "bubble",
    "selloff", "correction",
];

/// Fixed weights of the composite signal. Design constants, not inferred.
const SENTIMENT_WEIGHT: f64 = 0.6;
const ENGAGEMENT_WEIGHT: f64 = 0.4;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+").expect("valid url regex"));
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("valid mention regex"));
static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("valid non-letter regex"));

/// A [`PostRecord`] annotated with the derived signal columns. Original
/// fields are untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub post: PostRecord,
    pub cleaned_content: String,
    pub sentiment_score: i64,
    /// Min-max normalized engagement in [0, 1].
    pub engagement_score: f64,
    /// `0.6 * sentiment_score + 0.4 * engagement_score`.
    pub composite_signal: f64,
}

/// Normalize post text for tokenization. Idempotent.
///
/// Lowercases, strips URL tokens (`http…`/`www…`), strips `@mention`
/// tokens entirely, drops the `#` character while keeping the tag text,
/// then removes every character that is not a lowercase letter or
/// whitespace (punctuation, digits, emoji).
#[must_use]
pub fn clean_text(text: &str) -> String {
    let text = text.to_lowercase();
    let text = URL_RE.replace_all(&text, "");
    let text = MENTION_RE.replace_all(&text, "");
    let text = text.replace('#', "");
    NON_LETTER_RE.replace_all(&text, "").into_owned()
}

/// Score cleaned text by exact single-word lexicon matching: +1 per
/// bullish token, −1 per bearish token. Unbounded sum.
#[must_use]
pub fn sentiment_score(cleaned: &str) -> i64 {
    let mut score = 0i64;
    for token in cleaned.split_whitespace() {
        if BULLISH_WORDS.contains(&token) {
            score += 1;
        } else if BEARISH_WORDS.contains(&token) {
            score -= 1;
        }
    }
    score
}

/// Raw engagement: likes + 2×retweets + quote count. Replies are
/// intentionally excluded from the weighted formula.
fn raw_engagement(post: &PostRecord) -> u64 {
    post.likes
        .saturating_add(post.retweets.saturating_mul(2))
        .saturating_add(post.quote_count)
}

/// Annotate every record with the four derived signal columns.
///
/// Pure, deterministic, and total over any well-formed cleaned dataset,
/// including one-row and all-identical-engagement inputs: when the raw
/// engagement max equals the min, every engagement score is exactly 0.0
/// (never undefined, never 1.0), which keeps the normalization free of
/// division by zero.
#[must_use]
pub fn generate_signals(dataset: Dataset) -> Vec<ScoredRecord> {
    let records = dataset.into_records();
    let raw: Vec<u64> = records.iter().map(raw_engagement).collect();
    let min = raw.iter().copied().min().unwrap_or(0);
    let max = raw.iter().copied().max().unwrap_or(0);
    let span = max - min;

    records
        .into_iter()
        .zip(raw)
        .map(|(post, engagement)| {
            let cleaned_content = clean_text(&post.content);
            let sentiment = sentiment_score(&cleaned_content);
            #[allow(clippy::cast_precision_loss)]
            let engagement_score = if span == 0 {
                0.0
            } else {
                (engagement - min) as f64 / span as f64
            };
            ScoredRecord {
                composite_signal: composite_signal(sentiment, engagement_score),
                post,
                cleaned_content,
                sentiment_score: sentiment,
                engagement_score,
            }
        })
        .collect()
}

/// Weighted sum of the two component scores.
fn composite_signal(sentiment: i64, engagement: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let sentiment = sentiment as f64;
    SENTIMENT_WEIGHT * sentiment + ENGAGEMENT_WEIGHT * engagement
}
