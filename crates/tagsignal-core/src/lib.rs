//! Shared domain types and configuration for the tagsignal pipeline.
//!
//! The post schema lives here so that the collector, the processing stages,
//! and the persisted artifacts all agree on one fixed column set.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod post;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use post::{Dataset, PostRecord, PostRecordBuilder, SCHEMA_COLUMNS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
