//! Usage: Initial commit and push with upstream tracking.

use crate::git::reconcile::{DEFAULT_BRANCH, ORIGIN};
use crate::git::runner::Git;
use crate::shared::error::AppResult;

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Stage everything, commit, push "origin" "main" with upstream tracking so
/// later pushes need no explicit destination. Push failures surface as
/// `PUSH_FAILED` and are not retried.
pub fn publish(git: &Git) -> AppResult<()> {
    git.stage_all()?;
    git.commit(INITIAL_COMMIT_MESSAGE)?;
    git.push_set_upstream(ORIGIN, DEFAULT_BRANCH)
}
