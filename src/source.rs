//! Task list resolution.
//!
//! The task list is resolved once at startup, first available source wins:
//!
//! 1. `tasksZ` - a compressed list carried in the parameters.
//! 2. `tasksUrl` - a JSON list fetched with a single GET.
//! 3. A built-in single quiz, so the overlay is never empty.
//!
//! A source that fails to decode, fetch or parse is logged and skipped.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::{compress_to_uri_component, decompress_from_uri_component, CodecError};
use crate::config::OverlayConfig;
use crate::fields::TaskKind;
use crate::task::{answer_indices, Task};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not decompress task list: {0}")]
    Decode(#[from] CodecError),

    #[error("Could not parse task list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Retrieves the body behind a task list URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// Fetches `http(s)` URLs over the network and reads anything else
/// (`file://` URLs, plain paths) from disk.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self { agent: ureq::Agent::new_with_defaults() }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, SourceError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self.agent.get(url).call()?;
            return Ok(response.into_body().read_to_string()?);
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read_to_string(Path::new(path))
            .map_err(|source| SourceError::Io { path: path.to_string(), source })
    }
}

/// Which source produced the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Encoded,
    Remote,
    Default,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SourceKind::Encoded => "tasksZ",
            SourceKind::Remote => "tasksUrl",
            SourceKind::Default => "built-in default",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    pub source: SourceKind,
}

/// The task shown when no other source yields a list.
pub fn default_task() -> Task {
    Task {
        question: Some("Where is the armchair?".to_string()),
        options: Some(vec![
            "In the bedroom".to_string(),
            "In the living room".to_string(),
            "In the kitchen".to_string(),
        ]),
        answers: Some(answer_indices(&[1])),
        image: Some("https://placekitten.com/800/800".to_string()),
        ..Task::new(TaskKind::QuestionQuiz)
    }
}

/// Parse a JSON task list.
///
/// A document that is not an array yields an empty list. Elements without a
/// known `type` are skipped; the rest keep their order. Malformed fields
/// inside a task are kept and reported by validation instead.
pub fn parse_task_list(json: &str) -> Result<Vec<Task>, SourceError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        warn!("task list is not an array, using an empty list");
        return Ok(Vec::new());
    };

    let tasks = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "skipping element without a known task type");
                None
            }
        })
        .collect();
    Ok(tasks)
}

/// Decompress and parse a `tasksZ` value.
pub fn decode_task_list(encoded: &str) -> Result<Vec<Task>, SourceError> {
    let json = decompress_from_uri_component(encoded)?;
    parse_task_list(&json)
}

/// Serialize and compress a task list into a `tasksZ` value.
pub fn encode_task_list(tasks: &[Task]) -> Result<String, SourceError> {
    let json = serde_json::to_string(tasks)?;
    Ok(compress_to_uri_component(&json))
}

/// Resolve the task list from the configured sources.
pub fn resolve_tasks(config: &OverlayConfig, fetcher: &dyn Fetch) -> LoadedTasks {
    let loaded = try_sources(config, fetcher);
    info!(source = %loaded.source, count = loaded.tasks.len(), "task list resolved");
    for (index, task) in loaded.tasks.iter().enumerate() {
        for issue in task.validate() {
            warn!(task = index + 1, kind = %task.kind, %issue, "task data problem");
        }
    }
    loaded
}

fn try_sources(config: &OverlayConfig, fetcher: &dyn Fetch) -> LoadedTasks {
    if let Some(encoded) = config.tasks_z.as_deref() {
        match decode_task_list(encoded) {
            Ok(tasks) => return LoadedTasks { tasks, source: SourceKind::Encoded },
            Err(e) => warn!(error = %e, "tasksZ unusable, trying next source"),
        }
    }

    if let Some(url) = config.tasks_url.as_deref() {
        debug!(url, "fetching task list");
        match fetcher.fetch(url).and_then(|body| parse_task_list(&body)) {
            Ok(tasks) => return LoadedTasks { tasks, source: SourceKind::Remote },
            Err(e) => warn!(url, error = %e, "tasksUrl unusable, using default task"),
        }
    }

    LoadedTasks { tasks: vec![default_task()], source: SourceKind::Default }
}
