//! Task data structure and related functionality.
//!
//! This module defines the `Task` struct that describes one unit of overlay
//! content, together with load-time validation that reports malformed quiz
//! data without rejecting the task.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checker::compile_pattern;
use crate::fields::{TaskFamily, TaskKind};

/// One unit of content shown in the overlay card.
///
/// Every field except `kind` is optional. Which fields matter depends on the
/// kind: display tasks read `text`, quiz tasks read `question`, `options` and
/// `answers`, free-text tasks read `question`, `prompt` and `answer_pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient::options", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::answers", skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerEntry>>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub answer_pattern: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// One entry of a quiz's `answers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerEntry {
    /// Index of an expected option.
    Index(i64),
    /// Anything that is not an integer. Kept as written; it never matches a
    /// selection, so the quiz cannot be answered correctly.
    Malformed(Value),
}

impl AnswerEntry {
    fn from_value(value: Value) -> Self {
        match value.as_i64() {
            Some(index) => AnswerEntry::Index(index),
            None => AnswerEntry::Malformed(value),
        }
    }
}

/// Answer entries expecting the given option indices.
pub fn answer_indices(indices: &[i64]) -> Vec<AnswerEntry> {
    indices.iter().copied().map(AnswerEntry::Index).collect()
}

/// Field decoders that accept whatever shape the JSON has. Task data is
/// reported by [`Task::validate`], never rejected, so one bad field must not
/// drop the whole task.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::AnswerEntry;

    /// Strings pass through, numbers and booleans are written out, anything
    /// else counts as absent.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Every array element becomes an option label. A non-array is no options.
    pub fn options<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    /// Integers become indices; anything else is kept as a malformed entry.
    /// A bare non-array value counts as a single entry.
    pub fn answers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<AnswerEntry>>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::Array(items) => Some(items.into_iter().map(AnswerEntry::from_value).collect()),
            other => Some(vec![AnswerEntry::from_value(other)]),
        })
    }
}

/// A problem found in a task's data. Reported, never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskIssue {
    AnswerOutOfRange { answer: i64, options: usize },
    MalformedAnswer(String),
    NoOptions,
    InvalidPattern(String),
}

impl fmt::Display for TaskIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskIssue::AnswerOutOfRange { answer, options } => {
                write!(f, "answer index {answer} is outside the {options} option(s)")
            }
            TaskIssue::MalformedAnswer(raw) => {
                write!(f, "answer {raw} is not an option index and can never match")
            }
            TaskIssue::NoOptions => f.write_str("quiz has no options"),
            TaskIssue::InvalidPattern(msg) => write!(f, "answer pattern does not compile: {msg}"),
        }
    }
}

impl Task {
    /// Create an empty task of the given kind.
    pub fn new(kind: TaskKind) -> Self {
        Task {
            kind,
            text: None,
            question: None,
            options: None,
            answers: None,
            image: None,
            answer_pattern: None,
            prompt: None,
        }
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    pub fn answer_entries(&self) -> &[AnswerEntry] {
        self.answers.as_deref().unwrap_or(&[])
    }

    /// Expected option indices, leaving out malformed entries.
    pub fn answers(&self) -> Vec<i64> {
        self.answer_entries()
            .iter()
            .filter_map(|entry| match entry {
                AnswerEntry::Index(index) => Some(*index),
                AnswerEntry::Malformed(_) => None,
            })
            .collect()
    }

    pub fn has_malformed_answers(&self) -> bool {
        self.answer_entries().iter().any(|entry| matches!(entry, AnswerEntry::Malformed(_)))
    }

    /// Quiz options use multi-select controls when more than one answer is expected.
    pub fn is_multi_select(&self) -> bool {
        self.answer_entries().len() > 1
    }

    /// The image URL to show, if the kind allows an image and one is set.
    pub fn image_url(&self) -> Option<&str> {
        match self.image.as_deref() {
            Some(url) if !url.is_empty() && self.kind.is_image() => Some(url),
            _ => None,
        }
    }

    /// Text inspected when choosing the label language.
    pub fn localizable_text(&self) -> String {
        [self.text.as_deref(), self.question.as_deref()]
            .iter()
            .map(|part| part.unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Inspect the task for data that would make it unsolvable.
    pub fn validate(&self) -> Vec<TaskIssue> {
        let mut issues = Vec::new();
        match self.kind.family() {
            TaskFamily::Quiz => {
                let options = self.options().len();
                if options == 0 {
                    issues.push(TaskIssue::NoOptions);
                }
                for entry in self.answer_entries() {
                    match entry {
                        AnswerEntry::Index(answer) if *answer < 0 || *answer as usize >= options => {
                            issues.push(TaskIssue::AnswerOutOfRange { answer: *answer, options });
                        }
                        AnswerEntry::Index(_) => {}
                        AnswerEntry::Malformed(raw) => issues.push(TaskIssue::MalformedAnswer(raw.to_string())),
                    }
                }
            }
            TaskFamily::FreeText => {
                if let Some(pattern) = self.answer_pattern.as_deref() {
                    if let Err(e) = compile_pattern(pattern) {
                        issues.push(TaskIssue::InvalidPattern(e.to_string()));
                    }
                }
            }
            TaskFamily::Display => {}
        }
        issues
    }
}
