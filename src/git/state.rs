//! Usage: Snapshot of pre-existing local repository state.

use crate::git::runner::Git;
use crate::shared::error::AppResult;
use std::collections::{BTreeMap, BTreeSet};

/// What the directory looks like before reconciliation. Owned by the
/// reconciler for the duration of one run; nothing persists across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalRepoState {
    pub exists: bool,
    pub remotes: BTreeMap<String, String>,
    pub branches: BTreeSet<String>,
    pub current_branch: Option<String>,
}

impl LocalRepoState {
    pub fn absent() -> Self {
        Self::default()
    }
}

pub fn inspect(git: &Git) -> AppResult<LocalRepoState> {
    if !git.is_repository() {
        return Ok(LocalRepoState::absent());
    }
    Ok(LocalRepoState {
        exists: true,
        remotes: git.remotes()?,
        branches: git.local_branches()?,
        current_branch: git.current_branch()?,
    })
}
