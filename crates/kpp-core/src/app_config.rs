use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Whether clicking a second checkpoint adds to the selection or replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Multi,
    Single,
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionMode::Multi => write!(f, "multi"),
            SelectionMode::Single => write!(f, "single"),
        }
    }
}

/// Side-panel list arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListLayout {
    #[default]
    Flat,
    GroupedByCountry,
}

impl std::fmt::Display for ListLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListLayout::Flat => write!(f, "flat"),
            ListLayout::GroupedByCountry => write!(f, "grouped"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Local path or `http(s)` URL of the checkpoint GeoJSON.
    pub data_source: String,
    /// Optional YAML override for the source-key table.
    pub fields_path: Option<PathBuf>,
    pub log_level: String,
    pub search_debounce_ms: u64,
    pub list_limit: usize,
    pub list_layout: ListLayout,
    pub selection_mode: SelectionMode,
    pub cluster_radius: u32,
    pub cluster_max_zoom: u32,
    pub focus_min_zoom: f64,
    /// `0` waits for the map indefinitely.
    pub map_ready_timeout_ms: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub fn map_ready_timeout(&self) -> Option<Duration> {
        (self.map_ready_timeout_ms > 0).then(|| Duration::from_millis(self.map_ready_timeout_ms))
    }
}
