//! Usage: OAuth authorization-code handshake coordinator.
//!
//! Session lifecycle: bind the callback port, open the browser to the consent
//! page, await exactly one redirect, exchange its code for an access token.
//! The session resolves exactly once; the bound port is released on every
//! exit path because the listener is moved into the wait call.

pub(crate) mod browser;
pub(crate) mod callback_server;
pub(crate) mod token_exchange;

use crate::config::Config;
use crate::shared::error::{AppResult, AuthError};
use crate::shared::security::mask_token;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use reqwest::Url;
use std::time::Duration;

/// An access token that does not leak through Debug or logs.
pub struct AccessToken {
    secret: String,
}

impl AccessToken {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub(crate) fn reveal(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken")
            .field(&mask_token(&self.secret))
            .finish()
    }
}

/// Run the full three-legged handshake. Suspends until the provider redirects
/// back or `auth_timeout_secs` elapses.
pub async fn authorize(client: &reqwest::Client, config: &Config) -> AppResult<AccessToken> {
    let state = generate_state();
    let listener = callback_server::bind(config.callback_port).await?;
    tracing::debug!(port = listener.port(), "callback listener bound");
    let authorize_url = build_authorize_url(config, &state)?;

    // Spawned, not awaited: the handshake must not depend on the browser
    // process. The URL is echoed so the user can open it by hand.
    eprintln!("Opening your browser to authorize access...");
    eprintln!("If nothing opens, visit: {authorize_url}");
    if let Err(err) = browser::open_browser(&authorize_url) {
        tracing::warn!(%err, "browser launch failed; waiting for manual authorization");
    }

    let code = callback_server::wait_for_callback(
        listener,
        &state,
        Duration::from_secs(config.auth_timeout_secs),
    )
    .await?;
    // The listener is gone by now; only the exchange remains.
    let token = token_exchange::exchange_authorization_code(client, config, &code).await?;
    tracing::debug!(token = %mask_token(&token), "authorization completed");
    Ok(AccessToken::new(token))
}

fn build_authorize_url(config: &Config, state: &str) -> Result<String, AuthError> {
    let mut url = Url::parse(&config.authorize_url)
        .map_err(|e| AuthError::MalformedCallback(format!("invalid authorize_url: {e}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri())
        .append_pair("scope", &config.scope)
        .append_pair("state", state);
    Ok(url.to_string())
}

fn generate_state() -> String {
    let mut random = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random);
    URL_SAFE_NO_PAD.encode(random)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        crate::config::resolve(Default::default(), |key| match key {
            "REPOLIFT_CLIENT_ID" => Some("iv1.client".to_string()),
            "REPOLIFT_CLIENT_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .expect("config")
    }

    #[test]
    fn authorize_url_carries_all_query_parameters() {
        let config = test_config();
        let url = build_authorize_url(&config, "st4te").expect("url");
        let parsed = Url::parse(&url).expect("parse");
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("client_id".to_string(), "iv1.client".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:3000/callback".to_string()
        )));
        assert!(pairs.contains(&("scope".to_string(), "repo".to_string())));
        assert!(pairs.contains(&("state".to_string(), "st4te".to_string())));
    }

    #[test]
    fn state_values_are_unique_and_url_safe() {
        let a = generate_state();
        let b = generate_state();
        assert_ne!(a, b);
        assert!(a.len() >= 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn access_token_debug_is_masked() {
        let token = AccessToken::new("gho_sensitive_value_1234".to_string());
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("sensitive_value"));
        assert!(rendered.contains("gho_...1234"));
    }
}
