pub mod app_config;
pub mod checkpoint;
pub mod classify;
pub mod collate;
pub mod config;
pub mod fields;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ListLayout, SelectionMode};
pub use checkpoint::{Checkpoint, CheckpointStatus, CheckpointType, LngLat, UnknownCategory};
pub use classify::{classify_status, classify_type};
pub use collate::{collate, CollationKey};
pub use config::{load_app_config, load_app_config_from_env};
pub use fields::{load_field_table, FieldRule, FieldTable, LogicalField};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read field table {path}: {source}")]
    FieldsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse field table: {0}")]
    FieldsFileParse(#[source] serde_yaml::Error),

    #[error("field table validation failed: {0}")]
    Validation(String),
}
