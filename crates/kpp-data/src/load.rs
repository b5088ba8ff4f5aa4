//! One-shot loading of the checkpoint file from disk or over HTTP.
//!
//! There is no retry: a failed load is fatal to initialization and the
//! caller reports it to the user.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kpp_core::{AppConfig, FieldTable};

use crate::error::DataLoadError;
use crate::normalize::normalize;
use crate::types::Dataset;

/// Where the GeoJSON document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl FromStr for DataSource {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DataLoadError::InvalidSource {
                input: s.to_string(),
                reason: "empty".into(),
            });
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(DataSource::Url(trimmed.to_string()));
        }
        if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(DataLoadError::InvalidSource {
                input: s.to_string(),
                reason: format!("unsupported scheme \"{scheme}\""),
            });
        }

        Ok(DataSource::Path(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Settings for [`load_dataset`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub http_timeout: Duration,
    pub user_agent: String,
    pub fields: FieldTable,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(30),
            user_agent: "kpp/0.1 (checkpoint-map)".to_string(),
            fields: FieldTable::default(),
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig, fields: FieldTable) -> Self {
        Self {
            http_timeout: Duration::from_secs(config.http_timeout_secs),
            user_agent: config.user_agent.clone(),
            fields,
        }
    }
}

/// Read, parse and normalize the checkpoint file.
///
/// # Errors
///
/// Returns [`DataLoadError`] if the source cannot be read or fetched, the
/// body is not JSON, or the document is not a feature collection.
pub async fn load_dataset(
    source: &DataSource,
    options: &LoadOptions,
) -> Result<Dataset, DataLoadError> {
    let body = match source {
        DataSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|e| DataLoadError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?
        }
        DataSource::Url(url) => fetch_bytes(url, options).await?,
    };

    let raw: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| DataLoadError::Parse {
            context: source.to_string(),
            source: e,
        })?;

    let dataset = normalize(&raw, &options.fields)?;
    tracing::info!(
        source = %source,
        kept = dataset.report.kept,
        dropped_geometry = dataset.report.dropped_geometry,
        synthesized_ids = dataset.report.synthesized_ids,
        duplicate_ids = dataset.report.duplicate_ids,
        "checkpoint dataset loaded"
    );
    Ok(dataset)
}

async fn fetch_bytes(url: &str, options: &LoadOptions) -> Result<Vec<u8>, DataLoadError> {
    let client = reqwest::Client::builder()
        .timeout(options.http_timeout)
        .user_agent(options.user_agent.as_str())
        .build()?;

    tracing::debug!(url, "fetching checkpoint dataset");
    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataLoadError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response.bytes().await?.to_vec())
}
