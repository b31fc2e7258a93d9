//! Command implementations for the CLI interface.
//!
//! Each subcommand resolves what it needs from the overlay configuration and
//! either runs the terminal UI or prints a plain result for scripting.

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::checker::CheckOutcome;
use crate::cli::Cli;
use crate::codec::decompress_from_uri_component;
use crate::config::OverlayConfig;
use crate::render::RenderModel;
use crate::session::Session;
use crate::source::{encode_task_list, parse_task_list, resolve_tasks, Fetch, LoadedTasks};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal overlay.
    Ui,

    /// Resolve the task list and print it with any data problems.
    Tasks {
        /// Print the tasks as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Print the card of a task as JSON.
    Render {
        /// Task number, starting at 1.
        number: usize,
    },

    /// Check an answer without the UI. Exits 0 on a pass, 1 on a wrong
    /// answer, 2 when the task's pattern is broken.
    Check {
        /// Task number, starting at 1.
        number: usize,
        /// Option index to select, as listed by `render`. May be repeated.
        #[arg(long = "select", value_name = "INDEX")]
        select: Vec<usize>,
        /// Free-text answer.
        #[arg(long)]
        answer: Option<String>,
    },

    /// Compress a JSON task list file ("-" for stdin) into a tasksZ value.
    Encode {
        input: String,
    },

    /// Decompress a tasksZ value and print the JSON task list.
    Decode {
        value: String,
    },

    /// Print the resolved style variables.
    Theme,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn task_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Task numbers start at 1"),
    }
}

fn load_session(config: &OverlayConfig, fetcher: &dyn Fetch) -> (Session, LoadedTasks) {
    let loaded = resolve_tasks(config, fetcher);
    let session = Session::new(loaded.tasks.clone(), config.theme.clone());
    (session, loaded)
}

/// Run the terminal overlay.
pub fn cmd_ui(config: &OverlayConfig, fetcher: &dyn Fetch) -> Result<()> {
    let (session, loaded) = load_session(config, fetcher);
    info!(mode = %config.mode, source = %loaded.source, "starting overlay");
    run_tui(session, loaded.source).context("UI error")
}

/// Human-readable listing of a resolved task list.
pub fn format_task_list(loaded: &LoadedTasks) -> String {
    let mut out = format!("Source: {} ({} task(s))\n", loaded.source, loaded.tasks.len());
    for (index, task) in loaded.tasks.iter().enumerate() {
        let text = task.localizable_text();
        let text = text.trim();
        let summary = if text.is_empty() { "(no text)" } else { text };
        out.push_str(&format!("{:>3}. {:<20} {}\n", index + 1, task.kind.as_str(), summary));
        for (option, label) in task.options().iter().enumerate() {
            let marker = if task.answers().contains(&(option as i64)) { "*" } else { " " };
            out.push_str(&format!("       {marker} [{option}] {label}\n"));
        }
        for issue in task.validate() {
            out.push_str(&format!("       ! {issue}\n"));
        }
    }
    out
}

pub fn cmd_tasks(config: &OverlayConfig, fetcher: &dyn Fetch, json: bool) -> Result<()> {
    let loaded = resolve_tasks(config, fetcher);
    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.tasks)?);
    } else {
        print!("{}", format_task_list(&loaded));
    }
    Ok(())
}

pub fn render_model(config: &OverlayConfig, fetcher: &dyn Fetch, number: usize) -> Result<RenderModel> {
    let (mut session, _) = load_session(config, fetcher);
    Ok(session.open(task_index(number)?)?)
}

pub fn cmd_render(config: &OverlayConfig, fetcher: &dyn Fetch, number: usize) -> Result<()> {
    let model = render_model(config, fetcher, number)?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

/// Open a task, apply the given input, and check it.
pub fn check_answer(
    config: &OverlayConfig,
    fetcher: &dyn Fetch,
    number: usize,
    select: &[usize],
    answer: Option<&str>,
) -> Result<CheckOutcome> {
    let (mut session, _) = load_session(config, fetcher);
    session.open(task_index(number)?)?;
    for &option in select {
        session.select_option(option)?;
    }
    if let Some(answer) = answer {
        session.set_answer(answer)?;
    }
    Ok(session.check())
}

/// Process exit code for a scripted check.
pub fn exit_code(outcome: &CheckOutcome) -> i32 {
    match outcome {
        CheckOutcome::PatternError(_) => 2,
        outcome if outcome.is_pass() => 0,
        _ => 1,
    }
}

pub fn cmd_check(
    config: &OverlayConfig,
    fetcher: &dyn Fetch,
    number: usize,
    select: &[usize],
    answer: Option<&str>,
) -> Result<i32> {
    let outcome = check_answer(config, fetcher, number, select, answer)?;
    match &outcome {
        CheckOutcome::PatternError(detail) => println!("{}: {detail}", outcome.message()),
        _ => println!("{}", outcome.message()),
    }
    Ok(exit_code(&outcome))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("Could not read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("Could not read {input}"))
    }
}

/// Compress a JSON task list into a tasksZ value.
pub fn encode_json(json: &str) -> Result<String> {
    let tasks = parse_task_list(json)?;
    info!(count = tasks.len(), "encoding task list");
    Ok(encode_task_list(&tasks)?)
}

pub fn cmd_encode(input: &str) -> Result<()> {
    println!("{}", encode_json(&read_input(input)?)?);
    Ok(())
}

/// Decompress a tasksZ value into pretty-printed JSON.
pub fn decode_value(value: &str) -> Result<String> {
    let json = decompress_from_uri_component(value.trim())?;
    let parsed: serde_json::Value =
        serde_json::from_str(&json).context("tasksZ does not hold JSON")?;
    Ok(serde_json::to_string_pretty(&parsed)?)
}

pub fn cmd_decode(value: &str) -> Result<()> {
    println!("{}", decode_value(value)?);
    Ok(())
}

pub fn cmd_theme(config: &OverlayConfig) {
    for (name, value) in config.theme.style_variables() {
        println!("{name}: {value}");
    }
}

/// Generate shell completions for the CLI.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Params;
    use crate::fields::TaskKind;
    use crate::render::Body;
    use crate::source::{default_task, SourceError, SourceKind};
    use crate::task::{answer_indices, Task};

    struct NoNetwork;

    impl Fetch for NoNetwork {
        fn fetch(&self, url: &str) -> std::result::Result<String, SourceError> {
            Err(SourceError::Io {
                path: url.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "offline"),
            })
        }
    }

    fn config_with(tasks: &[Task]) -> OverlayConfig {
        let mut params = Params::default();
        params.set("tasksZ", &encode_task_list(tasks).unwrap());
        OverlayConfig::from_params(&params)
    }

    fn sample() -> Vec<Task> {
        vec![
            default_task(),
            Task {
                question: Some("Capital of France?".into()),
                answer_pattern: Some("^paris$".into()),
                ..Task::new(TaskKind::QuestionInput)
            },
            Task { answer_pattern: Some("(".into()), ..Task::new(TaskKind::QuestionInput) },
            Task { text: Some("Notes".into()), ..Task::new(TaskKind::Text) },
        ]
    }

    #[test]
    fn test_scripted_checks() {
        let config = config_with(&sample());
        let outcome = check_answer(&config, &NoNetwork, 1, &[1], None).unwrap();
        assert_eq!((outcome.clone(), exit_code(&outcome)), (CheckOutcome::Correct, 0));

        let outcome = check_answer(&config, &NoNetwork, 1, &[0], None).unwrap();
        assert_eq!(exit_code(&outcome), 1);

        let outcome = check_answer(&config, &NoNetwork, 2, &[], Some(" PARIS ")).unwrap();
        assert_eq!(outcome, CheckOutcome::Correct);

        let outcome = check_answer(&config, &NoNetwork, 3, &[], Some("x")).unwrap();
        assert!(matches!(outcome, CheckOutcome::PatternError(_)));
        assert_eq!(exit_code(&outcome), 2);

        let outcome = check_answer(&config, &NoNetwork, 4, &[], None).unwrap();
        assert_eq!((outcome.clone(), exit_code(&outcome)), (CheckOutcome::Acknowledged, 0));
    }

    #[test]
    fn test_check_rejects_bad_input() {
        let config = config_with(&sample());
        assert!(check_answer(&config, &NoNetwork, 0, &[], None).is_err());
        assert!(check_answer(&config, &NoNetwork, 9, &[], None).is_err());
        assert!(check_answer(&config, &NoNetwork, 1, &[7], None).is_err());
        assert!(check_answer(&config, &NoNetwork, 1, &[], Some("text")).is_err());
    }

    #[test]
    fn test_render_model_for_number() {
        let model = render_model(&config_with(&sample()), &NoNetwork, 2).unwrap();
        assert_eq!(model.index, 1);
        assert_eq!(model.progress, "2/4");
        assert!(matches!(model.body, Body::Input { .. }));
    }

    #[test]
    fn test_unreachable_url_uses_default_task() {
        let mut params = Params::default();
        params.set("tasksUrl", "https://offline.test/tasks.json");
        let config = OverlayConfig::from_params(&params);
        let outcome = check_answer(&config, &NoNetwork, 1, &[1], None).unwrap();
        assert_eq!(outcome, CheckOutcome::Correct);
    }

    #[test]
    fn test_task_listing_shows_answers_and_issues() {
        let loaded = LoadedTasks {
            tasks: vec![
                default_task(),
                Task { options: Some(vec!["a".into()]), answers: Some(answer_indices(&[4])), ..Task::new(TaskKind::QuestionQuiz) },
            ],
            source: SourceKind::Encoded,
        };
        let listing = format_task_list(&loaded);
        assert!(listing.starts_with("Source: tasksZ (2 task(s))"));
        assert!(listing.contains("* [1] In the living room"));
        assert!(listing.contains("(no text)"));
        assert!(listing.contains("! answer index 4 is outside the 1 option(s)"));
    }

    #[test]
    fn test_encode_then_decode_json() {
        let json = r#"[{"type":"text","text":"Привет"}]"#;
        let encoded = encode_json(json).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&decode_value(&encoded).unwrap()).unwrap();
        assert_eq!(decoded, serde_json::json!([{"type": "text", "text": "Привет"}]));
        assert!(decode_value("%%%").is_err());
        assert!(encode_json("not json").is_err());
    }
}
