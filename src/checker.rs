//! Answer checking.
//!
//! The checker is a pure function of the open task and the response the card
//! collected for it. It returns a [`CheckOutcome`] for the caller to show;
//! nothing here touches a display surface.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::fields::TaskFamily;
use crate::task::Task;

pub const HINT_MESSAGE: &str = "🙂 Think again!";

/// Input collected by the card for the open task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Response {
    #[default]
    Empty,
    /// Indices of the selected option rows.
    Choices(BTreeSet<usize>),
    /// Raw contents of the free-text field.
    Text(String),
}

/// Result of checking the open task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Correct,
    Incorrect,
    /// Free-text task without a pattern; the answer is kept, not graded.
    Saved,
    /// Display-only task.
    Acknowledged,
    /// The task's answer pattern does not compile.
    PatternError(String),
    NoTaskOpen,
}

impl CheckOutcome {
    /// Short message shown in the card's result line.
    pub fn message(&self) -> &'static str {
        match self {
            CheckOutcome::Correct => "✅ Correct!",
            CheckOutcome::Incorrect => "❌ Try again.",
            CheckOutcome::Saved => "✅ Saved",
            CheckOutcome::Acknowledged => "👍",
            CheckOutcome::PatternError(_) => "Pattern error",
            CheckOutcome::NoTaskOpen => "No task is open",
        }
    }

    /// Whether the outcome counts as passing for scripted checks.
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Correct | CheckOutcome::Saved | CheckOutcome::Acknowledged)
    }
}

/// Compile an answer pattern the way free-text answers are matched.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Check `response` against `task`.
pub fn check(task: &Task, response: &Response) -> CheckOutcome {
    match task.kind.family() {
        TaskFamily::Display => CheckOutcome::Acknowledged,
        TaskFamily::Quiz => check_choices(task, response),
        TaskFamily::FreeText => check_text(task, response),
    }
}

/// Selected indices and expected answers must be the same set. Each row
/// contributes at most one index, so duplicates in `answers` never match,
/// and neither does a quiz with a non-integer answer entry.
fn check_choices(task: &Task, response: &Response) -> CheckOutcome {
    if task.has_malformed_answers() {
        return CheckOutcome::Incorrect;
    }
    let mut chosen: Vec<i64> = match response {
        Response::Choices(selected) => selected.iter().map(|&i| i as i64).collect(),
        _ => Vec::new(),
    };
    let mut expected = task.answers();
    chosen.sort_unstable();
    expected.sort_unstable();

    if chosen == expected {
        CheckOutcome::Correct
    } else {
        CheckOutcome::Incorrect
    }
}

fn check_text(task: &Task, response: &Response) -> CheckOutcome {
    let value = match response {
        Response::Text(text) => text.trim(),
        _ => "",
    };
    let pattern = match task.answer_pattern.as_deref() {
        Some(pattern) if !pattern.is_empty() => pattern,
        _ => return CheckOutcome::Saved,
    };

    match compile_pattern(pattern) {
        Ok(re) if re.is_match(value) => CheckOutcome::Correct,
        Ok(_) => CheckOutcome::Incorrect,
        Err(e) => CheckOutcome::PatternError(e.to_string()),
    }
}
