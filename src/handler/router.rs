//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::handler::{data, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    peer: Option<SocketAddr>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let path = req.uri().path();

    let mut response = route_request(method, path, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if state.access_log() {
        let mut entry = AccessLogEntry::new(peer, method, path, req.version());
        entry.query = req.uri().query().map(ToString::to_string);
        entry.referer = header_string(&req, REFERER);
        entry.user_agent = header_string(&req, USER_AGENT);
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.elapsed = started.elapsed();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Route request based on method and path
async fn route_request(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    let is_head = match *method {
        Method::GET => false,
        Method::HEAD => true,
        Method::OPTIONS => return http::build_options_response(state.config.http.enable_cors),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            return http::build_405_response();
        }
    };

    // 2. Health check endpoints, never touch the spreadsheet
    let health = &state.config.routes.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    // 3. Fixed routes
    match path {
        "/" => pages::serve_client(is_head),
        "/agent" => pages::serve_agent(is_head),
        "/api/data" => data::serve_data(state, is_head).await,
        _ => http::build_404_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sheet::SheetSource;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::StatusCode;
    use hyper_util::rt::TokioIo;
    use tokio::net::TcpListener;

    const UNREACHABLE: &str = "http://127.0.0.1:1/sheet.csv";

    /// Serve the same canned response to every request on a throwaway port
    async fn spawn_sheet_server(
        status: u16,
        content_type: &'static str,
        body: &'static str,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let service = service_fn(move |_req: Request<hyper::body::Incoming>| async move {
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header(CONTENT_TYPE, content_type)
                                .body(Full::new(Bytes::from_static(body.as_bytes())))
                                .unwrap(),
                        )
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });
        format!("http://{addr}/pub?output=csv")
    }

    fn state_for(url: &str) -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist/dashboard").unwrap();
        config.source.url = url.to_string();
        config.logging.access_log = false;
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Arc::new(AppState {
            source: SheetSource::with_client(client, config.source.url.clone()),
            config,
        })
    }

    async fn get(state: &Arc<AppState>, method: Method, path: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap();
        handle_request(req, None, Arc::clone(state)).await.unwrap()
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(resp).await).unwrap()
    }

    #[tokio::test]
    async fn test_data_example_rows() {
        let url = spawn_sheet_server(200, "text/csv", "name,age\nAlice,30\nBob,\n").await;
        let state = state_for(&url);

        let resp = get(&state, Method::GET, "/api/data").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let body = body_bytes(resp).await;
        assert_eq!(
            &body[..],
            br#"[{"name":"Alice","age":30},{"name":"Bob","age":null}]"#
        );
    }

    #[tokio::test]
    async fn test_data_is_stable_across_requests() {
        let url = spawn_sheet_server(200, "text/csv", "id,score,tag\n1,2.5,a\n2,,b\n3,4,\n").await;
        let state = state_for(&url);

        let first = body_json(get(&state, Method::GET, "/api/data").await).await;
        let second = body_json(get(&state, Method::GET, "/api/data").await).await;
        assert_eq!(first, second);
        assert_eq!(first.as_array().unwrap().len(), 3);
        assert_eq!(first[2]["tag"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_data_unreachable_source() {
        let state = state_for(UNREACHABLE);

        let resp = get(&state, Method::GET, "/api/data").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object["error"].is_string());
    }

    #[tokio::test]
    async fn test_data_silent_source_times_out() {
        let upstream = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = upstream.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = upstream.accept().await {
                held.push(stream);
            }
        });

        let mut config = Config::load_from("does-not-exist/dashboard").unwrap();
        config.source.url = format!("http://{addr}/pub?output=csv");
        config.source.timeout_secs = 1;
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config).unwrap());

        let started = Instant::now();
        let resp = get(&state, Method::GET, "/api/data").await;
        let elapsed = started.elapsed();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert!(json["error"].is_string());
        assert!(elapsed >= std::time::Duration::from_millis(900), "{elapsed:?}");
        assert!(elapsed < std::time::Duration::from_secs(5), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_data_http_error_status() {
        let url = spawn_sheet_server(404, "text/plain", "gone").await;
        let state = state_for(&url);

        let json = body_json(get(&state, Method::GET, "/api/data").await).await;
        assert_eq!(json, serde_json::json!({"error": "HTTP Error 404: Not Found"}));
    }

    #[tokio::test]
    async fn test_data_html_instead_of_csv() {
        let url = spawn_sheet_server(200, "text/html; charset=utf-8", "<html>sign in</html>").await;
        let state = state_for(&url);

        let json = body_json(get(&state, Method::GET, "/api/data").await).await;
        assert!(json["error"].as_str().unwrap().contains("text/html"));
    }

    #[tokio::test]
    async fn test_pages_do_not_depend_on_source() {
        let state = state_for(UNREACHABLE);

        for path in ["/", "/agent"] {
            let resp = get(&state, Method::GET, path).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
            assert!(!body_bytes(resp).await.is_empty());
        }

        let client = body_bytes(get(&state, Method::GET, "/").await).await;
        let agent = body_bytes(get(&state, Method::GET, "/agent").await).await;
        assert_ne!(client, agent);
    }

    #[tokio::test]
    async fn test_head_page_has_empty_body() {
        let state = state_for(UNREACHABLE);
        let resp = get(&state, Method::HEAD, "/agent").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_health_and_unknown_routes() {
        let state = state_for(UNREACHABLE);

        let health = get(&state, Method::GET, "/healthz").await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(&body_bytes(health).await[..], b"ok");

        let ready = get(&state, Method::GET, "/readyz").await;
        assert_eq!(ready.status(), StatusCode::OK);

        let missing = get(&state, Method::GET, "/agent/").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_handling() {
        let state = state_for(UNREACHABLE);

        let post = get(&state, Method::POST, "/api/data").await;
        assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);

        let options = get(&state, Method::OPTIONS, "/api/data").await;
        assert_eq!(options.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_server_header() {
        let state = state_for(UNREACHABLE);
        let resp = get(&state, Method::GET, "/").await;
        assert_eq!(resp.headers()[SERVER], "sheet-dashboard");
    }
}
