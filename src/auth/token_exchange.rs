//! Usage: Exchange an authorization code for an access token.

use crate::config::Config;
use crate::shared::error::AuthError;
use serde_json::{json, Value};

pub(crate) async fn exchange_authorization_code(
    client: &reqwest::Client,
    config: &Config,
    code: &str,
) -> Result<String, AuthError> {
    let body = json!({
        "client_id": config.client_id,
        "client_secret": config.client_secret,
        "code": code.trim(),
        "redirect_uri": config.redirect_uri(),
    });

    let response = client
        .post(&config.token_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| AuthError::Exchange {
            status: 0,
            message: format!("token exchange request failed: {e}"),
        })?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| AuthError::Exchange {
        status,
        message: format!("token response read failed: {e}"),
    })?;
    parse_token_response(status, &body)
}

/// GitHub's token endpoint reports grant failures (e.g. an expired code) with
/// HTTP 200 and an `error` field in the body, so both paths are checked.
pub(crate) fn parse_token_response(status: u16, body: &str) -> Result<String, AuthError> {
    if !(200..300).contains(&status) {
        return Err(AuthError::Exchange {
            status,
            message: error_snippet(body),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|e| AuthError::Exchange {
        status,
        message: format!("token response is not JSON: {e}"),
    })?;

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let detail = value
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or("no description");
        return Err(AuthError::Exchange {
            status,
            message: format!("{error}: {detail}"),
        });
    }

    value
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AuthError::Exchange {
            status,
            message: "token response missing access_token".to_string(),
        })
}

fn error_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(240).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_access_token() {
        let token = parse_token_response(
            200,
            r#"{"access_token":"gho_abc123","token_type":"bearer","scope":"repo"}"#,
        )
        .expect("token");
        assert_eq!(token, "gho_abc123");
    }

    #[test]
    fn surfaces_in_band_error_despite_http_200() {
        let err = parse_token_response(
            200,
            r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#,
        )
        .expect_err("must fail");
        match err {
            AuthError::Exchange { status, message } => {
                assert_eq!(status, 200);
                assert!(message.contains("bad_verification_code"));
                assert!(message.contains("expired"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn surfaces_http_failure_with_status() {
        let err = parse_token_response(502, "bad gateway").expect_err("must fail");
        match err {
            AuthError::Exchange { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("bad gateway"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_or_empty_access_token_is_rejected() {
        for body in [r#"{}"#, r#"{"access_token":""}"#, r#"{"access_token":"  "}"#] {
            let err = parse_token_response(200, body).expect_err("must fail");
            assert!(err.to_string().contains("missing access_token"));
        }
    }
}
