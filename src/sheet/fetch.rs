//! Outbound fetch of the published spreadsheet.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::error::SheetError;
use super::parse::parse_records;
use super::value::Record;
use crate::config::SourceConfig;

/// HTTP client bound to one spreadsheet export URL
#[derive(Debug, Clone)]
pub struct SheetSource {
    client: reqwest::Client,
    url: String,
}

impl SheetSource {
    pub fn new(config: &SourceConfig, user_agent: &str) -> Result<Self, SheetError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self::with_client(client, config.url.clone()))
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the CSV export as text. One attempt, no retry.
    pub async fn fetch_csv(&self) -> Result<String, SheetError> {
        debug!(url = %self.url, "fetching spreadsheet");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::status(status));
        }

        // Unpublished sheets answer 200 with a sign-in page
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if content_type.trim_start().starts_with("text/html") {
                return Err(SheetError::UnexpectedContentType(content_type.to_string()));
            }
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "spreadsheet downloaded");
        Ok(body)
    }

    /// Fetch and parse into records
    pub async fn fetch_records(&self) -> Result<Vec<Record>, SheetError> {
        let body = self.fetch_csv().await?;
        parse_records(&body)
    }
}
