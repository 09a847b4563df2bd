//! Usage: One-shot localhost callback listener for the OAuth authorization-code flow.
//!
//! The bound listener is a scoped resource: `wait_for_callback` takes it by
//! value and drops it on every return path, so the port is released whether
//! the handshake succeeds, fails, or times out. A duplicate or late callback
//! is structurally unreachable rather than merely ignored.

use crate::shared::error::AuthError;
use crate::shared::security::constant_time_eq;
use reqwest::Url;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const CALLBACK_PATH: &str = "/callback";
const MAX_REQUEST_BYTES: usize = 8192;

const SUCCESS_HTML: &str =
    "<html><body><h1>Authentication successful</h1><p>You may close this tab and return to the terminal.</p></body></html>";
const FAILURE_HTML: &str =
    "<html><body><h1>Authentication failed</h1><p>You may close this tab and retry.</p></body></html>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallbackPayload {
    pub(crate) code: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) error_description: Option<String>,
}

#[derive(Debug)]
pub(crate) struct BoundListener {
    port: u16,
    listener_v4: TcpListener,
    // Best effort: some hosts resolve `localhost` to ::1 first.
    listener_v6: Option<TcpListener>,
}

impl BoundListener {
    pub(crate) fn port(&self) -> u16 {
        self.port
    }
}

/// Bind the loopback callback port. Port 0 picks a dynamic port (tests);
/// the v4 socket is mandatory, v6 is attempted on the same port.
pub(crate) async fn bind(port: u16) -> Result<BoundListener, AuthError> {
    let listener_v4 = TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| AuthError::PortBind(format!("127.0.0.1:{port} ({e})")))?;
    let bound_port = listener_v4
        .local_addr()
        .map_err(|e| AuthError::PortBind(format!("local_addr failed: {e}")))?
        .port();
    let listener_v6 = match TcpListener::bind(("::1", bound_port)).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            tracing::debug!(port = bound_port, %err, "ipv6 loopback bind skipped");
            None
        }
    };
    Ok(BoundListener {
        port: bound_port,
        listener_v4,
        listener_v6,
    })
}

/// Await exactly one inbound callback and return its authorization code.
///
/// The first accepted connection resolves the session: the listener is
/// consumed and closed before the caller can begin the token exchange.
pub(crate) async fn wait_for_callback(
    listener: BoundListener,
    expected_state: &str,
    timeout: Duration,
) -> Result<String, AuthError> {
    let accept_future = async {
        match listener.listener_v6.as_ref() {
            Some(v6) => {
                tokio::select! {
                    result = listener.listener_v4.accept() => result,
                    result = v6.accept() => result,
                }
            }
            None => listener.listener_v4.accept().await,
        }
    };

    let (mut socket, _) = tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| AuthError::Timeout(timeout.as_secs()))?
        .map_err(|e| AuthError::MalformedCallback(format!("callback accept failed: {e}")))?;

    let mut buffer = vec![0u8; MAX_REQUEST_BYTES];
    let size = socket
        .read(&mut buffer)
        .await
        .map_err(|e| AuthError::MalformedCallback(format!("callback read failed: {e}")))?;
    if size == 0 {
        return Err(AuthError::MalformedCallback(
            "callback request is empty".to_string(),
        ));
    }

    let request = String::from_utf8_lossy(&buffer[..size]);
    let outcome = extract_request_target(request.as_ref())
        .and_then(parse_callback_target)
        .and_then(|payload| accept_payload(payload, expected_state));

    let (status, body) = match &outcome {
        Ok(_) => ("HTTP/1.1 200 OK", SUCCESS_HTML),
        Err(_) => ("HTTP/1.1 400 Bad Request", FAILURE_HTML),
    };
    let response = format!(
        "{status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    drop(socket);
    // Release the port before the caller moves on to the exchange step.
    drop(listener);

    outcome
}

fn extract_request_target(request: &str) -> Result<&str, AuthError> {
    let first_line = request
        .lines()
        .next()
        .ok_or_else(|| AuthError::MalformedCallback("empty request line".to_string()))?;
    let mut parts = first_line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    if method != "GET" || target.is_empty() {
        return Err(AuthError::MalformedCallback(
            "callback must be a GET request".to_string(),
        ));
    }
    Ok(target)
}

pub(crate) fn parse_callback_target(target: &str) -> Result<CallbackPayload, AuthError> {
    let url = Url::parse(&format!("http://localhost{target}"))
        .map_err(|e| AuthError::MalformedCallback(format!("invalid callback target: {e}")))?;
    if url.path() != CALLBACK_PATH {
        return Err(AuthError::MalformedCallback(format!(
            "unexpected callback path '{}'",
            url.path()
        )));
    }

    let mut payload = CallbackPayload {
        code: None,
        state: None,
        error: None,
        error_description: None,
    };
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => payload.code = Some(value.to_string()),
            "state" => payload.state = Some(value.to_string()),
            "error" => payload.error = Some(value.to_string()),
            "error_description" => payload.error_description = Some(value.to_string()),
            _ => {}
        }
    }
    Ok(payload)
}

fn accept_payload(payload: CallbackPayload, expected_state: &str) -> Result<String, AuthError> {
    if let Some(error) = payload.error {
        let detail = payload
            .error_description
            .unwrap_or_else(|| "no description".to_string());
        return Err(AuthError::MalformedCallback(format!(
            "provider reported '{error}': {detail}"
        )));
    }

    let state = payload
        .state
        .as_deref()
        .ok_or_else(|| AuthError::MalformedCallback("callback missing state".to_string()))?;
    if !constant_time_eq(state.as_bytes(), expected_state.as_bytes()) {
        return Err(AuthError::MalformedCallback(
            "callback state mismatch".to_string(),
        ));
    }

    payload
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            AuthError::MalformedCallback("callback missing authorization code".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpStream;

    #[test]
    fn parse_target_extracts_code_and_state() {
        let payload = parse_callback_target("/callback?code=abc123&state=xyz").expect("payload");
        assert_eq!(payload.code.as_deref(), Some("abc123"));
        assert_eq!(payload.state.as_deref(), Some("xyz"));
        assert!(payload.error.is_none());
    }

    #[test]
    fn parse_target_rejects_other_paths() {
        let err = parse_callback_target("/favicon.ico").expect_err("must fail");
        assert!(err.to_string().contains("path"));
    }

    #[test]
    fn accept_rejects_missing_code() {
        let payload = parse_callback_target("/callback?state=xyz").expect("payload");
        let err = accept_payload(payload, "xyz").expect_err("must fail");
        assert!(err.to_string().contains("authorization code"));
    }

    #[test]
    fn accept_rejects_state_mismatch() {
        let payload = parse_callback_target("/callback?code=abc&state=evil").expect("payload");
        let err = accept_payload(payload, "expected").expect_err("must fail");
        assert!(err.to_string().contains("state mismatch"));
    }

    #[test]
    fn accept_surfaces_provider_error() {
        let payload =
            parse_callback_target("/callback?error=access_denied&error_description=nope&state=s")
                .expect("payload");
        let err = accept_payload(payload, "s").expect_err("must fail");
        assert!(err.to_string().contains("access_denied"));
        assert!(err.to_string().contains("nope"));
    }

    async fn send_callback(port: u16, target: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", port))
            .await
            .expect("connect");
        let request = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.expect("write");
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.expect("read");
        String::from_utf8_lossy(&response).to_string()
    }

    #[tokio::test]
    async fn resolves_once_and_releases_the_port() {
        let listener = bind(0).await.expect("bind");
        let port = listener.port();

        let client = tokio::spawn(async move {
            send_callback(port, "/callback?code=abc123&state=xyz").await
        });
        let code = wait_for_callback(listener, "xyz", Duration::from_secs(5))
            .await
            .expect("callback");
        assert_eq!(code, "abc123");
        assert!(client.await.expect("client").starts_with("HTTP/1.1 200"));

        // The port is free again: a late callback has nowhere to land.
        let rebound = bind(port).await.expect("port released after resolution");
        assert_eq!(rebound.port(), port);
    }

    #[tokio::test]
    async fn times_out_when_no_callback_arrives() {
        let listener = bind(0).await.expect("bind");
        let port = listener.port();

        let err = wait_for_callback(listener, "xyz", Duration::from_millis(50))
            .await
            .expect_err("no client connected, the wait must time out");
        assert!(matches!(err, AuthError::Timeout(_)));

        bind(port).await.expect("port released after timeout");
    }

    #[tokio::test]
    async fn malformed_callback_still_releases_the_port() {
        let listener = bind(0).await.expect("bind");
        let port = listener.port();

        let client = tokio::spawn(async move { send_callback(port, "/callback?state=xyz").await });
        let err = wait_for_callback(listener, "xyz", Duration::from_secs(5))
            .await
            .expect_err("missing code must fail");
        assert!(matches!(err, AuthError::MalformedCallback(_)));
        assert!(client.await.expect("client").starts_with("HTTP/1.1 400"));

        bind(port).await.expect("port released after failure");
    }
}
