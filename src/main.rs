//! # taskcard - task and quiz overlay for the terminal
//!
//! Shows a short sequence of tasks (reading passages, multiple-choice quizzes,
//! free-text questions) as a card over a row of numbered progress bubbles.
//!
//! ## Key Features
//!
//! - **Three task sources**: a compressed `tasksZ` value, a JSON list fetched
//!   from `tasksUrl`, or a built-in sample quiz
//! - **Seven task kinds**: text, quiz and free-text input, each with an
//!   optional image variant
//! - **Themeable card**: colors, transparency, border and neon emphasis from
//!   the same parameters an editor appends to the overlay URL
//! - **Russian or English labels**, picked from the task's own text
//! - **Scriptable**: every card and check is available as a plain subcommand
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the overlay with the built-in quiz
//! taskcard ui
//!
//! # Open a task list from a file or URL
//! taskcard ui --tasks-url tasks.json
//!
//! # Pack a task list into a tasksZ value and check an answer with it
//! Z=$(taskcard encode tasks.json)
//! taskcard check 1 --select 1 --tasks-z "$Z"
//!
//! # Use the parameters of an existing overlay URL
//! taskcard theme --params 'https://overlay.example/?bg=%23101820&neon=1'
//! ```
//!
//! ## Key Commands
//!
//! - `taskcard ui` - Launch the overlay
//! - `taskcard tasks` - List the resolved tasks and any data problems
//! - `taskcard render <n>` - Print the card of task `n` as JSON
//! - `taskcard check <n>` - Check an answer, exit code reports the result
//! - `taskcard encode` / `decode` - Convert between JSON and tasksZ
//! - `taskcard theme` - Print the resolved style variables
//!
//! Logs go to stderr, or to `$TMPDIR/taskcard.log` while the overlay is open.
//! Set `RUST_LOG` or `--log-level` to change the filter.

use clap::Parser;

pub mod checker;
pub mod cli;
pub mod cmd;
pub mod codec;
pub mod config;
pub mod fields;
pub mod locale;
pub mod logging;
pub mod progress;
pub mod render;
pub mod session;
pub mod source;
pub mod task;
pub mod theme;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::OverlayConfig;
use source::HttpFetcher;

fn main() {
    let cli = Cli::parse();

    // The UI owns the terminal, so its logs go to a file
    match &cli.command {
        Commands::Ui => {
            let path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
            if let Err(e) = logging::init_file(&cli.log_level, &path) {
                eprintln!("Logging disabled: could not open {}: {e}", path.display());
            }
        }
        _ => logging::init_stderr(&cli.log_level),
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn overlay_config(cli: &Cli) -> anyhow::Result<OverlayConfig> {
    Ok(OverlayConfig::from_params(&cli.params()?))
}

/// Dispatch a parsed command line. Returns the process exit code.
fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Ui => cmd_ui(&overlay_config(cli)?, &HttpFetcher::new())?,
        Commands::Tasks { json } => cmd_tasks(&overlay_config(cli)?, &HttpFetcher::new(), *json)?,
        Commands::Render { number } => cmd_render(&overlay_config(cli)?, &HttpFetcher::new(), *number)?,
        Commands::Check { number, select, answer } => {
            return cmd_check(&overlay_config(cli)?, &HttpFetcher::new(), *number, select, answer.as_deref());
        }
        Commands::Encode { input } => cmd_encode(input)?,
        Commands::Decode { value } => cmd_decode(value)?,
        Commands::Theme => cmd_theme(&overlay_config(cli)?),
        Commands::Completions { shell } => cmd_completions(*shell),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress_to_uri_component;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("taskcard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_config_is_only_built_when_needed() {
        let value = compress_to_uri_component("[]");
        let decode = parse(&["--params", "http://[broken", "decode", value.as_str()]);
        assert_eq!(run(&decode).unwrap(), 0);

        let theme = parse(&["--params", "http://[broken", "theme"]);
        assert!(run(&theme).is_err());
    }

    #[test]
    fn test_check_exit_codes() {
        assert_eq!(run(&parse(&["check", "1", "--select", "1"])).unwrap(), 0);
        assert_eq!(run(&parse(&["check", "1", "--select", "0"])).unwrap(), 1);
        assert!(run(&parse(&["check", "0"])).is_err());
    }
}
