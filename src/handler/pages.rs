//! Dashboard pages
//!
//! Both documents are compiled into the binary and fetch `/api/data` from
//! the browser, so serving them never touches the spreadsheet.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

const CLIENT_PAGE: &str = include_str!("../../templates/client.html");
const AGENT_PAGE: &str = include_str!("../../templates/agent.html");

/// `GET /`
pub fn serve_client(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(CLIENT_PAGE, is_head)
}

/// `GET /agent`
pub fn serve_agent(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(AGENT_PAGE, is_head)
}
