//! Failures on the fetch-and-parse path.
//!
//! All of them reach the client the same way, as `{"error": "<Display>"}`,
//! so the messages are written for a human reading the dashboard.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to fetch spreadsheet: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP Error {code}: {reason}")]
    Status { code: u16, reason: String },

    #[error("expected CSV from spreadsheet source, got '{0}'")]
    UnexpectedContentType(String),

    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Error tokenizing data: expected {expected} fields in line {line}, saw {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl SheetError {
    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = SheetError::status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP Error 404: Not Found");
    }

    #[test]
    fn test_field_count_message() {
        let err = SheetError::FieldCount {
            line: 3,
            expected: 2,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "Error tokenizing data: expected 2 fields in line 3, saw 3"
        );
    }
}
