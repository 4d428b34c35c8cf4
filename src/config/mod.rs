// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, SourceConfig};

/// Published CSV export of the dashboard spreadsheet
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSiSUl6UU5tT1Wgjq2ns5XzZ5JmH3j1xZPs9DGI8dtfVZ7RhVPb9-kixWDV3GoCoZXgTwz4cMfCFYSg/pub?output=csv";

/// Default config file, resolved by the `config` crate with any supported extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default "config" file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Layers, lowest first: built-in defaults, the file (optional),
    /// then `DASHBOARD__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("source.url", DEFAULT_SOURCE_URL)?
            .set_default("source.timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "sheet-dashboard")?
            .set_default("http.enable_cors", false)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
