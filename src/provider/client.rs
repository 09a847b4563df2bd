//! Usage: GitHub REST client for repository creation and license-text fetch.

use crate::auth::AccessToken;
use crate::provider::{RepositoryDescriptor, Visibility};
use crate::shared::error::{AppError, AppResult};
use serde_json::{json, Value};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github.v3+json";
/// GitHub reports "name already exists on this account" as 422.
const STATUS_NAME_CONFLICT: u16 = 422;

pub struct ProviderClient {
    http: reqwest::Client,
    api_base: String,
    token: AccessToken,
}

impl ProviderClient {
    pub fn new(http: reqwest::Client, api_base: String, token: AccessToken) -> Self {
        Self {
            http,
            api_base,
            token,
        }
    }

    /// Create a repository for the authenticated user.
    ///
    /// A name conflict is an expected, user-actionable outcome and is never
    /// retried here: the same name would reproduce the identical conflict.
    pub async fn create_repository(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> AppResult<RepositoryDescriptor> {
        let url = format!("{}/user/repos", self.api_base);
        let body = json!({ "name": name, "private": visibility.is_private() });
        let (status, text) = self.post_json(&url, &body).await?;
        let clone_url = parse_create_repository_response(status, &text, name)?;
        tracing::info!(%name, %clone_url, "remote repository created");
        Ok(RepositoryDescriptor {
            name: name.to_string(),
            visibility,
            clone_url,
        })
    }

    /// Fetch raw license text by provider key (e.g. "mit").
    pub async fn fetch_license_text(&self, key: &str) -> AppResult<String> {
        let url = format!("{}/licenses/{key}", self.api_base);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", self.token.reveal()),
            )
            .send()
            .await
            .map_err(request_failed)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(request_failed)?;
        parse_license_response(status, &text)
    }

    async fn post_json(&self, url: &str, body: &Value) -> AppResult<(u16, String)> {
        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", self.token.reveal()),
            )
            .json(body)
            .send()
            .await
            .map_err(request_failed)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(request_failed)?;
        Ok((status, text))
    }
}

fn request_failed(err: reqwest::Error) -> AppError {
    AppError::Provider {
        status: 0,
        message: format!("request failed: {err}"),
    }
}

pub(crate) fn parse_create_repository_response(
    status: u16,
    body: &str,
    name: &str,
) -> AppResult<String> {
    if status == STATUS_NAME_CONFLICT {
        return Err(AppError::NameConflict {
            name: name.to_string(),
        });
    }
    if !(200..300).contains(&status) {
        return Err(AppError::Provider {
            status,
            message: extract_api_message(body),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|e| AppError::Provider {
        status,
        message: format!("create response is not JSON: {e}"),
    })?;
    value
        .get("clone_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Provider {
            status,
            message: "create response missing clone_url".to_string(),
        })
}

pub(crate) fn parse_license_response(status: u16, body: &str) -> AppResult<String> {
    if !(200..300).contains(&status) {
        return Err(AppError::Provider {
            status,
            message: extract_api_message(body),
        });
    }
    let value: Value = serde_json::from_str(body).map_err(|e| AppError::Provider {
        status,
        message: format!("license response is not JSON: {e}"),
    })?;
    value
        .get("body")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Provider {
            status,
            message: "license response missing body".to_string(),
        })
}

/// GitHub error payloads carry a top-level `message`.
fn extract_api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(240).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_repository_yields_clone_url() {
        let clone_url = parse_create_repository_response(
            201,
            r#"{"name":"demo","clone_url":"https://github.com/me/demo.git"}"#,
            "demo",
        )
        .expect("clone url");
        assert_eq!(clone_url, "https://github.com/me/demo.git");
    }

    #[test]
    fn status_422_is_a_name_conflict_not_a_provider_error() {
        let err = parse_create_repository_response(
            422,
            r#"{"message":"Repository creation failed.","errors":[{"message":"name already exists on this account"}]}"#,
            "demo",
        )
        .expect_err("must fail");
        match err {
            AppError::NameConflict { name } => assert_eq!(name, "demo"),
            other => panic!("expected NameConflict, got {other}"),
        }
    }

    #[test]
    fn other_failures_preserve_status_and_message() {
        let err = parse_create_repository_response(
            403,
            r#"{"message":"API rate limit exceeded"}"#,
            "demo",
        )
        .expect_err("must fail");
        match err {
            AppError::Provider { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API rate limit exceeded");
            }
            other => panic!("expected Provider, got {other}"),
        }
    }

    #[test]
    fn license_body_is_extracted() {
        let text = parse_license_response(200, r#"{"key":"mit","body":"MIT License\n..."}"#)
            .expect("license text");
        assert!(text.starts_with("MIT License"));
    }

    #[test]
    fn missing_license_body_is_a_provider_error() {
        let err = parse_license_response(200, r#"{"key":"mit"}"#).expect_err("must fail");
        assert!(matches!(err, AppError::Provider { .. }));
    }
}
