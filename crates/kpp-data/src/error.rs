use thiserror::Error;

/// Any failure that prevents the checkpoint dataset from loading.
///
/// Loading is all-or-nothing: callers surface this as a status message and
/// show no partial data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("invalid data source \"{input}\": {reason}")]
    InvalidSource { input: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON parse error for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not a GeoJSON FeatureCollection: {reason}")]
    NotAFeatureCollection { reason: String },
}
