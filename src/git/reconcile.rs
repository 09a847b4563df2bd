//! Usage: Reconcile arbitrary prior local repository state into the canonical shape.
//!
//! Canonical shape: exactly one remote named "origin" pointing at the freshly
//! created clone URL, current branch "main". Planning is a pure function over
//! the observed state so every prior-state combination is testable without a
//! real repository; execution replays the plan through the git runner and
//! re-inspects to enforce the postcondition.

use crate::git::runner::Git;
use crate::git::state::{self, LocalRepoState};
use crate::interact::Prompter;
use crate::provider::RepositoryDescriptor;
use crate::shared::error::{AppError, AppResult};

pub const ORIGIN: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";

/// One mutation of local repository state. Replace semantics throughout:
/// a pre-existing origin URL is discarded, never merged or renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    InitRepository,
    RemoveOrigin,
    AddOrigin { url: String },
    /// "main" already exists; switch to it, history preserved.
    SwitchToMain,
    /// No "main" yet; create it from the current HEAD.
    CreateMain,
}

/// Derived once from the observed state, consumed once by `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    steps: Vec<Step>,
}

impl ReconciliationPlan {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Derive the plan for a state whose reuse (if it was needed) has already
/// been confirmed.
pub fn plan(state: &LocalRepoState, clone_url: &str) -> ReconciliationPlan {
    let mut steps = Vec::new();

    if !state.exists {
        steps.push(Step::InitRepository);
        steps.push(Step::AddOrigin {
            url: clone_url.to_string(),
        });
        // A fresh init has no branches; fall through to branch resolution.
    } else {
        if state.remotes.contains_key(ORIGIN) {
            steps.push(Step::RemoveOrigin);
        }
        steps.push(Step::AddOrigin {
            url: clone_url.to_string(),
        });
    }

    let has_main = state.exists && state.branches.contains(DEFAULT_BRANCH);
    let already_on_main = state.current_branch.as_deref() == Some(DEFAULT_BRANCH);
    if has_main {
        if !already_on_main {
            steps.push(Step::SwitchToMain);
        }
    } else {
        steps.push(Step::CreateMain);
    }

    ReconciliationPlan { steps }
}

/// Full reconciliation: confirm reuse when needed, derive and execute the
/// plan, then verify the postcondition before the publisher runs.
pub fn reconcile(
    git: &Git,
    state: &LocalRepoState,
    descriptor: &RepositoryDescriptor,
    prompter: &mut dyn Prompter,
) -> AppResult<()> {
    if state.exists && !prompter.confirm_reuse()? {
        // Declined: stop with zero mutation of any kind.
        return Err(AppError::Cancelled);
    }

    let plan = plan(state, &descriptor.clone_url);
    tracing::debug!(steps = ?plan.steps(), "executing reconciliation plan");
    execute(git, &plan)?;
    verify_postcondition(git, &descriptor.clone_url)
}

fn execute(git: &Git, plan: &ReconciliationPlan) -> AppResult<()> {
    for step in plan.steps() {
        match step {
            Step::InitRepository => git.init()?,
            Step::RemoveOrigin => git.remove_remote(ORIGIN)?,
            Step::AddOrigin { url } => git.add_remote(ORIGIN, url)?,
            Step::SwitchToMain => git.switch_branch(DEFAULT_BRANCH)?,
            Step::CreateMain => git.create_branch(DEFAULT_BRANCH)?,
        }
    }
    Ok(())
}

/// Re-inspect and fail loudly rather than hand inconsistent state to the
/// publisher.
fn verify_postcondition(git: &Git, clone_url: &str) -> AppResult<()> {
    let state = state::inspect(git)?;
    match state.remotes.get(ORIGIN).map(String::as_str) {
        Some(url) if url == clone_url => {}
        Some(url) => {
            return Err(AppError::GitState(format!(
                "origin points at '{url}' after reconciliation, expected '{clone_url}'"
            )))
        }
        None => {
            return Err(AppError::GitState(
                "origin remote missing after reconciliation".to_string(),
            ))
        }
    }
    if state.current_branch.as_deref() != Some(DEFAULT_BRANCH) {
        return Err(AppError::GitState(format!(
            "current branch is {:?} after reconciliation, expected '{DEFAULT_BRANCH}'",
            state.current_branch
        )));
    }
    Ok(())
}
