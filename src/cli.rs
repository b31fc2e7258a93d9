use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::{parse_override, ConfigError, Params};

/// Task and quiz overlay for the terminal.
/// Tasks come from a compressed `tasksZ` value, a JSON list at `tasksUrl`,
/// or a built-in sample quiz.
#[derive(Parser)]
#[command(name = "taskcard", version, about = "Task and quiz overlay for the terminal")]
pub struct Cli {
    /// Overlay parameters, as a full page URL or a query string.
    #[arg(long, global = true, value_name = "URL|QUERY")]
    pub params: Option<String>,

    /// URL or file path of a JSON task list. Overrides `tasksUrl`.
    #[arg(long, global = true)]
    pub tasks_url: Option<String>,

    /// Compressed task list. Overrides `tasksZ`.
    #[arg(long, global = true)]
    pub tasks_z: Option<String>,

    /// Turn on neon emphasis.
    #[arg(long, global = true)]
    pub neon: bool,

    /// Override any parameter, e.g. `--set bg=#101820`. May be repeated.
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log file used while the terminal UI runs.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parameters from `--params` with the individual flags applied on top.
    pub fn params(&self) -> Result<Params, ConfigError> {
        let mut params = match &self.params {
            Some(raw) => Params::parse(raw)?,
            None => Params::default(),
        };
        if let Some(url) = &self.tasks_url {
            params.set("tasksUrl", url);
        }
        if let Some(encoded) = &self.tasks_z {
            params.set("tasksZ", encoded);
        }
        if self.neon {
            params.set("neon", "1");
        }
        for (key, value) in &self.overrides {
            params.set(key, value);
        }
        Ok(params)
    }
}
