//! Usage: OAuth app credentials and endpoint configuration.
//!
//! Credentials are never compiled in. They come from a TOML file
//! (`--config`, `$REPOLIFT_CONFIG`, or `~/.config/repolift/config.toml`)
//! with `REPOLIFT_CLIENT_ID` / `REPOLIFT_CLIENT_SECRET` /
//! `REPOLIFT_CALLBACK_PORT` environment overrides on top. Tokens are not
//! persisted between runs.

use crate::shared::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CALLBACK_PORT: u16 = 3000;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;
const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_SCOPE: &str = "repo";

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub callback_port: u16,
    pub auth_timeout_secs: u64,
    pub authorize_url: String,
    pub token_url: String,
    pub api_base: String,
    pub scope: String,
}

impl Config {
    /// Redirect URI registered with the OAuth app. Must match byte-for-byte
    /// what the provider has on file, so the host is fixed to `localhost`.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.callback_port)
    }

    pub fn load(explicit_path: Option<&Path>) -> AppResult<Self> {
        let file = match resolve_config_path(explicit_path) {
            Some(path) => read_config_file(&path)?,
            None => ConfigFile::default(),
        };
        resolve(file, |key| std::env::var(key).ok())
    }
}

/// On-disk schema. Everything is optional; validation happens after the
/// environment overrides are merged in.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    client_id: Option<String>,
    client_secret: Option<String>,
    callback_port: Option<u16>,
    auth_timeout_secs: Option<u64>,
    authorize_url: Option<String>,
    token_url: Option<String>,
    api_base: Option<String>,
    scope: Option<String>,
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("REPOLIFT_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let default = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".config/repolift/config.toml"))?;
    default.exists().then_some(default)
}

fn read_config_file(path: &Path) -> AppResult<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&raw).map_err(|e| AppError::Config(format!("invalid {}: {e}", path.display())))
}

/// Merge environment overrides over the file values and validate. `lookup` is
/// injected so the merge stays testable without touching the process env.
pub(crate) fn resolve(
    file: ConfigFile,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppResult<Config> {
    let client_id = lookup("REPOLIFT_CLIENT_ID")
        .or(file.client_id)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config("client_id is not configured".to_string()))?;
    let client_secret = lookup("REPOLIFT_CLIENT_SECRET")
        .or(file.client_secret)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config("client_secret is not configured".to_string()))?;

    let callback_port = match lookup("REPOLIFT_CALLBACK_PORT") {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Config(format!("REPOLIFT_CALLBACK_PORT is not a port: {raw}")))?,
        None => file.callback_port.unwrap_or(DEFAULT_CALLBACK_PORT),
    };

    Ok(Config {
        client_id,
        client_secret,
        callback_port,
        auth_timeout_secs: file.auth_timeout_secs.unwrap_or(DEFAULT_AUTH_TIMEOUT_SECS),
        authorize_url: file
            .authorize_url
            .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string()),
        token_url: file
            .token_url
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        api_base: file.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        scope: file.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn file_values_with_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            client_id = "iv1.abc"
            client_secret = "shh"
            "#,
        )
        .expect("parse");
        let config = resolve(file, no_env).expect("resolve");
        assert_eq!(config.client_id, "iv1.abc");
        assert_eq!(config.callback_port, DEFAULT_CALLBACK_PORT);
        assert_eq!(config.scope, "repo");
        assert_eq!(config.redirect_uri(), "http://localhost:3000/callback");
    }

    #[test]
    fn env_overrides_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            client_id = "from-file"
            client_secret = "from-file"
            callback_port = 4000
            "#,
        )
        .expect("parse");
        let config = resolve(file, |key| match key {
            "REPOLIFT_CLIENT_ID" => Some("from-env".to_string()),
            "REPOLIFT_CALLBACK_PORT" => Some("5000".to_string()),
            _ => None,
        })
        .expect("resolve");
        assert_eq!(config.client_id, "from-env");
        assert_eq!(config.client_secret, "from-file");
        assert_eq!(config.callback_port, 5000);
    }

    #[test]
    fn missing_credentials_is_config_error() {
        let err = resolve(ConfigFile::default(), no_env).expect_err("must fail");
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn bad_port_override_is_config_error() {
        let file: ConfigFile = toml::from_str(
            r#"
            client_id = "a"
            client_secret = "b"
            "#,
        )
        .expect("parse");
        let err = resolve(file, |key| {
            (key == "REPOLIFT_CALLBACK_PORT").then(|| "not-a-port".to_string())
        })
        .expect_err("must fail");
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let parsed: Result<ConfigFile, _> = toml::from_str("acess_token = \"typo\"");
        assert!(parsed.is_err());
    }
}
