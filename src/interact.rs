//! Usage: Interactive input collection (name, visibility, license, reuse confirm).
//!
//! The flow only depends on the `Prompter` trait; tests substitute a scripted
//! implementation instead of a terminal.

use crate::provider::{LicenseChoice, Visibility};
use crate::shared::error::{AppError, AppResult};
use std::io::{BufRead, Write};

pub trait Prompter {
    fn repository_name(&mut self) -> AppResult<String>;
    fn visibility(&mut self) -> AppResult<Visibility>;
    fn license(&mut self) -> AppResult<LicenseChoice>;
    /// Asked only when the directory is already a git repository.
    fn confirm_reuse(&mut self) -> AppResult<bool>;
}

/// Terminal prompter: questions to stderr, answers from stdin. Re-asks on
/// invalid input; a closed input stream is a hard error.
pub struct StdinPrompter;

impl StdinPrompter {
    fn ask(&self, question: &str) -> AppResult<String> {
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{question} ")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(AppError::Config("input stream closed".to_string()));
        }
        Ok(line.trim().to_string())
    }

    fn ask_until<T>(
        &self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> AppResult<T> {
        loop {
            let answer = self.ask(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(hint) => eprintln!("{hint}"),
            }
        }
    }
}

impl Prompter for StdinPrompter {
    fn repository_name(&mut self) -> AppResult<String> {
        self.ask_until("Repository name:", parse_repository_name)
    }

    fn visibility(&mut self) -> AppResult<Visibility> {
        self.ask_until("Visibility (public/private):", parse_visibility)
    }

    fn license(&mut self) -> AppResult<LicenseChoice> {
        self.ask_until(
            "License (mit/apache-2.0/gpl-3.0/unlicense/none):",
            parse_license,
        )
    }

    fn confirm_reuse(&mut self) -> AppResult<bool> {
        self.ask_until(
            "This directory is already a git repository. Reuse it? (yes/no):",
            parse_yes_no,
        )
    }
}

pub(crate) fn parse_repository_name(input: &str) -> Result<String, String> {
    let name = input.trim();
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if name.chars().any(char::is_whitespace) {
        return Err("name must not contain whitespace".to_string());
    }
    Ok(name.to_string())
}

pub(crate) fn parse_visibility(input: &str) -> Result<Visibility, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "public" => Ok(Visibility::Public),
        "private" => Ok(Visibility::Private),
        other => Err(format!("expected 'public' or 'private', got '{other}'")),
    }
}

pub(crate) fn parse_license(input: &str) -> Result<LicenseChoice, String> {
    let key = input.trim().to_ascii_lowercase();
    LicenseChoice::ALL
        .into_iter()
        .find(|choice| choice.prompt_key() == key)
        .ok_or_else(|| format!("unknown license '{key}'; one of mit/apache-2.0/gpl-3.0/unlicense/none"))
}

pub(crate) fn parse_yes_no(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(format!("expected yes or no, got '{other}'")),
    }
}
