//! Processing stages for collected posts: cleaning and deduplication,
//! keyword-lexicon signal generation, and artifact persistence (raw CSV,
//! processed Parquet).
//!
//! Both `clean` and `generate_signals` are pure over in-memory data; file
//! IO lives in [`store`] so the stages themselves stay side-effect free
//! apart from tracing diagnostics.

pub mod clean;
pub mod error;
pub mod signal;
pub mod store;

pub use clean::{clean, CleanOutcome};
pub use error::ProcessError;
pub use signal::{clean_text, generate_signals, sentiment_score, ScoredRecord};
pub use store::{load_raw_csv, write_raw_csv, write_signals_parquet, RawRow};
