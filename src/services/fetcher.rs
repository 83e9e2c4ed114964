//! Network access to the Eurogames API
//!
//! One network exchange per call, no retries, no caching. The body is handed
//! back as an untyped JSON value; interpreting its shape is the normalizer's job.

use crate::services::config::ClientConfig;
use crate::types::{EurogamesError, Result, TransportError};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

/// Longest slice of an error body kept in `TransportError::Status`
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Performs requests against the remote service
pub trait Fetcher {
    /// GET `path` with the given query parameters. Idempotent.
    fn fetch(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<Value, TransportError>;

    /// POST `body` as JSON to `path`. Not idempotent.
    fn submit(&self, path: &str, body: &Value) -> std::result::Result<Value, TransportError>;
}

/// `Fetcher` backed by a blocking reqwest client.
///
/// All fields are fixed at construction, so one instance can serve
/// concurrent callers without locking.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("eurogames/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EurogamesError::Config(format!("HTTP client error: {}", e)))?;

        debug!(
            base_url = config.base_url(),
            auth = config.api_key().is_some(),
            "HTTP fetcher initialized"
        );

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn execute(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> std::result::Result<Value, TransportError> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "response received");

        let body = response.text().map_err(|e| classify(url, e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let payload = decode_body(url, &body)?;
        debug!(url, shape = %shape_of(&payload), "response decoded");
        Ok(payload)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<Value, TransportError> {
        let url = self.url(path);
        debug!(
            url = %url,
            params = ?query,
            auth = self.api_key.is_some(),
            "GET request"
        );
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(&url, request)
    }

    fn submit(&self, path: &str, body: &Value) -> std::result::Result<Value, TransportError> {
        let url = self.url(path);
        debug!(url = %url, auth = self.api_key.is_some(), "POST request");
        let request = self.client.post(&url).json(body);
        self.execute(&url, request)
    }
}

fn classify(url: &str, source: reqwest::Error) -> TransportError {
    let url = url.to_string();
    if source.is_timeout() {
        TransportError::Timeout { url, source }
    } else {
        TransportError::Request { url, source }
    }
}

/// Empty bodies (e.g. `204 No Content`) decode to `null`
fn decode_body(url: &str, body: &str) -> std::result::Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|source| TransportError::Decode {
        url: url.to_string(),
        source,
    })
}

fn shape_of(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("list[{}]", items.len()),
        Value::Object(map) => format!("object[{}]", map.len()),
        Value::Null => "null".to_string(),
        _ => "scalar".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    /// Answer exactly one HTTP request on a loopback port.
    /// Returns the base URL and a receiver for the raw request text.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let _ = tx.send(request);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        });
        (format!("http://{}", addr), rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn fetcher(base_url: &str, api_key: Option<&str>) -> HttpFetcher {
        let config = ClientConfig::new(
            base_url,
            api_key.map(String::from),
            Duration::from_secs(5),
        );
        HttpFetcher::new(&config).unwrap()
    }

    // ========== Success ==========

    #[test]
    fn test_fetch_decodes_json_and_sends_query() {
        let (url, rx) = serve_once("200 OK", r#"{"data": [{"id": 1}], "meta": {"total": 1}}"#);
        let payload = fetcher(&url, None)
            .fetch("/v1/games", &[("status", "Playing".to_string())])
            .unwrap();
        assert_eq!(payload["data"][0]["id"], 1);

        let request = rx.recv().unwrap();
        assert!(
            request.starts_with("GET /v1/games?status=Playing HTTP/1.1"),
            "request was: {}",
            request
        );
    }

    #[test]
    fn test_bearer_header_when_key_configured() {
        let (url, rx) = serve_once("200 OK", "[]");
        fetcher(&url, Some("secret-token")).fetch("/v1/plays", &[]).unwrap();
        let request = rx.recv().unwrap().to_lowercase();
        assert!(
            request.contains("authorization: bearer secret-token"),
            "request was: {}",
            request
        );
    }

    #[test]
    fn test_no_auth_header_without_key() {
        let (url, rx) = serve_once("200 OK", "[]");
        fetcher(&url, None).fetch("/v1/plays", &[]).unwrap();
        let request = rx.recv().unwrap().to_lowercase();
        assert!(!request.contains("authorization:"), "request was: {}", request);
    }

    #[test]
    fn test_submit_posts_json_body() {
        let (url, rx) = serve_once("201 Created", r#"{"success": true}"#);
        let body = json!({"date": "2024-06-01", "game_id": 3, "winner": "Trish"});
        let payload = fetcher(&url, None).submit("/v1/plays", &body).unwrap();
        assert_eq!(payload["success"], true);

        let request = rx.recv().unwrap();
        assert!(request.starts_with("POST /v1/plays HTTP/1.1"));
        let sent: Value = serde_json::from_str(request.split("\r\n\r\n").nth(1).unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn test_empty_body_is_null() {
        let (url, _rx) = serve_once("204 No Content", "");
        let payload = fetcher(&url, None).submit("/v1/plays", &json!({})).unwrap();
        assert!(payload.is_null());
    }

    // ========== Failures ==========

    #[test]
    fn test_non_success_status_is_transport_error() {
        let (url, _rx) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#);
        let err = fetcher(&url, None).fetch("/v1/stats/winners", &[]).unwrap_err();
        match err {
            TransportError::Status { status, body, url } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
                assert!(url.ends_with("/v1/stats/winners"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let (url, _rx) = serve_once("200 OK", r#"{"data": [1, 2"#);
        let err = fetcher(&url, None).fetch("/v1/games", &[]).unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_connection_refused_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = fetcher(&format!("http://{}", addr), None)
            .fetch("/v1/games", &[])
            .unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }), "got {err:?}");
    }

    #[test]
    fn test_slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(3));
                drop(stream);
            }
        });
        let config = ClientConfig::new(format!("http://{}", addr), None, Duration::from_millis(300));
        let err = HttpFetcher::new(&config)
            .unwrap()
            .fetch("/v1/games", &[])
            .unwrap_err();
        assert!(
            matches!(err, TransportError::Timeout { .. } | TransportError::Request { .. }),
            "got {err:?}"
        );
    }

    // ========== Helpers ==========

    #[test]
    fn test_url_joins_without_double_slash() {
        let f = fetcher("http://127.0.0.1:9/", None);
        assert_eq!(f.url("/v1/games"), "http://127.0.0.1:9/v1/games");
        assert_eq!(f.url("v1/games/3/history"), "http://127.0.0.1:9/v1/games/3/history");
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(shape_of(&json!([1, 2])), "list[2]");
        assert_eq!(shape_of(&json!({"data": []})), "object[1]");
        assert_eq!(shape_of(&Value::Null), "null");
        assert_eq!(shape_of(&json!(3)), "scalar");
    }
}
