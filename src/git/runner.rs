//! Usage: Thin wrapper over `git` subprocess primitives, one operation per method.

use crate::shared::error::{AppError, AppResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::Command;

pub struct Git {
    dir: PathBuf,
}

impl Git {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Whether the directory itself is the root of a working tree.
    pub fn is_repository(&self) -> bool {
        self.dir.join(".git").exists()
    }

    pub fn init(&self) -> AppResult<()> {
        self.run_state(&["init"]).map(drop)
    }

    pub fn add_remote(&self, name: &str, url: &str) -> AppResult<()> {
        self.run_state(&["remote", "add", name, url]).map(drop)
    }

    pub fn remove_remote(&self, name: &str) -> AppResult<()> {
        self.run_state(&["remote", "remove", name]).map(drop)
    }

    /// Remote name -> fetch URL.
    pub fn remotes(&self) -> AppResult<BTreeMap<String, String>> {
        let raw = self.run_state(&["remote", "-v"])?;
        Ok(parse_remotes(&raw))
    }

    pub fn local_branches(&self) -> AppResult<BTreeSet<String>> {
        let raw = self.run_state(&["branch", "--list", "--format=%(refname:short)"])?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Current branch name; works for an unborn branch too (fresh `git init`).
    pub fn current_branch(&self) -> AppResult<Option<String>> {
        let output = self.output(&["symbolic-ref", "--short", "-q", "HEAD"])?;
        if !output.status.success() {
            // Detached HEAD: symbolic-ref exits non-zero with empty stderr.
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!name.is_empty()).then_some(name))
    }

    pub fn switch_branch(&self, branch: &str) -> AppResult<()> {
        self.run_state(&["checkout", branch]).map(drop)
    }

    /// Create `branch` at the current HEAD and switch to it.
    pub fn create_branch(&self, branch: &str) -> AppResult<()> {
        self.run_state(&["checkout", "-b", branch]).map(drop)
    }

    pub fn stage_all(&self) -> AppResult<()> {
        self.run_state(&["add", "."]).map(drop)
    }

    pub fn commit(&self, message: &str) -> AppResult<()> {
        self.run_state(&["commit", "-m", message]).map(drop)
    }

    pub fn push_set_upstream(&self, remote: &str, branch: &str) -> AppResult<()> {
        let output = self.output(&["push", "--set-upstream", remote, branch])?;
        if !output.status.success() {
            return Err(AppError::Push(command_failure("push", &output)));
        }
        Ok(())
    }

    /// Run git and map failure to `GitState`; any mutation failure is fatal
    /// for the whole run.
    fn run_state(&self, args: &[&str]) -> AppResult<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(AppError::GitState(command_failure(args[0], &output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn output(&self, args: &[&str]) -> AppResult<std::process::Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| AppError::GitState(format!("failed to run git {}: {e}", args[0])))
    }
}

fn command_failure(operation: &str, output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr.trim();
    if detail.is_empty() {
        format!("git {operation} failed with {}", output.status)
    } else {
        format!("git {operation} failed: {detail}")
    }
}

/// Parse `git remote -v`; only the (fetch) entry of each remote is kept.
pub(crate) fn parse_remotes(raw: &str) -> BTreeMap<String, String> {
    let mut remotes = BTreeMap::new();
    for line in raw.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url), Some(kind)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if kind == "(fetch)" {
            remotes.insert(name.to_string(), url.to_string());
        }
    }
    remotes
}
