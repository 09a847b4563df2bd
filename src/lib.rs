//! Publish a local directory to a freshly created GitHub repository.
//!
//! One run: OAuth authorization-code handshake, remote repository creation,
//! optional license fetch, reconciliation of any prior local git state into
//! one canonical shape (single "origin" remote, branch "main"), then the
//! initial commit and push with upstream tracking.

pub mod auth;
pub mod config;
pub mod exit_codes;
pub mod git;
pub mod interact;
pub mod logging;
pub mod provider;
pub mod scaffold;
pub mod shared;

use crate::auth::browser;
use crate::config::Config;
use crate::git::runner::Git;
use crate::interact::Prompter;
use crate::provider::ProviderClient;
use crate::shared::error::{AppError, AppResult};
use std::path::Path;
use std::time::Duration;

/// Run the whole provisioning flow against `dir` and return the clone URL.
///
/// Ordering matters: authorization aborts before anything is created, and a
/// name conflict on the provider aborts before any local git mutation. If
/// reconciliation or the push fails later, the already-created remote
/// repository is deliberately left in place; re-running with the same name
/// then fails with NAME_CONFLICT instead of silently creating a duplicate.
pub async fn provision(
    dir: &Path,
    config: &Config,
    prompter: &mut dyn Prompter,
) -> AppResult<String> {
    let http = http_client()?;

    let token = auth::authorize(&http, config).await?;

    let name = prompter.repository_name()?;
    let visibility = prompter.visibility()?;
    let provider = ProviderClient::new(http, config.api_base.clone(), token);
    let descriptor = provider.create_repository(&name, visibility).await?;

    let license = prompter.license()?;
    if let Some(key) = license.api_key() {
        let text = provider.fetch_license_text(key).await?;
        scaffold::write_license(dir, &text)?;
    }
    scaffold::write_readme(dir, &name, license)?;

    let git = Git::new(dir);
    let state = git::state::inspect(&git)?;
    git::reconcile::reconcile(&git, &state, &descriptor, prompter)?;
    git::publish::publish(&git)?;

    // Best effort; the push already succeeded.
    if let Err(err) = browser::open_browser(&descriptor.clone_url) {
        tracing::warn!(%err, "could not open the repository page");
    }
    Ok(descriptor.clone_url)
}

fn http_client() -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("repolift/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| AppError::Config(format!("http client init failed: {e}")))
}
