use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CUSTOMER_PULSE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub recency: RecencyConfig,
    #[serde(default)]
    pub outreach: OutreachConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to a JSON export of the backend's last-purchase table. The store
    /// starts empty when unset.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecencyConfig {
    /// Day count above which a customer appears in the inactive listing.
    #[serde(default = "default_inactive_threshold_days")]
    pub inactive_threshold_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutreachConfig {
    /// Store name substituted into message templates.
    #[serde(default = "default_store_name")]
    pub store_name: String,
    /// Maximum rendered messages returned per outreach preview.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

// Default functions
fn default_node_id() -> String {
    "pulse-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_inactive_threshold_days() -> i64 {
    90
}
fn default_store_name() -> String {
    "Lui Bambini".to_string()
}
fn default_preview_limit() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
        }
    }
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            inactive_threshold_days: default_inactive_threshold_days(),
        }
    }
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
            preview_limit: default_preview_limit(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            store: StoreConfig::default(),
            recency: RecencyConfig::default(),
            outreach: OutreachConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CUSTOMER_PULSE")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
