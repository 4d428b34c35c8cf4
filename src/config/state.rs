// Application state module
// Immutable per-process state shared by every connection

use super::types::Config;
use crate::sheet::{SheetError, SheetSource};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Client for the remote spreadsheet, built once and reused
    pub source: SheetSource,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, SheetError> {
        let source = SheetSource::new(&config.source, &config.http.server_name)?;

        Ok(Self {
            config: config.clone(),
            source,
        })
    }

    /// Whether access log lines should be written
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
