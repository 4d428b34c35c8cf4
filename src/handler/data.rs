//! `/api/data`: the spreadsheet as a JSON array of row objects.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::sheet::{Record, SheetError};

/// Failure payload; always sent with status 200
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Fetch, parse and serialize the sheet.
///
/// Fetch and parse failures never escape as transport errors; they become
/// `{"error": "..."}` with status 200.
pub async fn serve_data(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let result = state.source.fetch_records().await;
    if let Err(ref e) = result {
        logger::log_fetch_failed(state.source.url(), e);
    }
    render(result, state.config.http.enable_cors, is_head)
}

fn render(
    result: Result<Vec<Record>, SheetError>,
    enable_cors: bool,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match result {
        Ok(records) => {
            tracing::debug!(
                rows = records.len(),
                columns = records.first().map_or(0, Record::len),
                "spreadsheet served"
            );
            http::build_json_response(&records, enable_cors, is_head)
        }
        Err(e) => http::build_json_response(
            &ErrorBody {
                error: e.to_string(),
            },
            enable_cors,
            is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_render_error_shape() {
        let resp = render(Err(SheetError::NoColumns), false, false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "No columns to parse from file"})
        );
    }

    #[tokio::test]
    async fn test_render_empty_sheet() {
        let resp = render(Ok(Vec::new()), false, false);
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }
}
