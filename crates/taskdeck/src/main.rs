//! CLI entry point for taskdeck.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskdeck_app::{ApiClient, Settings};
use taskdeck_core::Priority;
use taskdeck_store_json::JsonStore;
use time::Date;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod tui;

/// Tasks over a REST service with a terminal client.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: a task list served over HTTP, driven from the terminal"
)]
struct Cli {
    /// Base URL of the task service.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the task service.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
        /// Directory for task documents (defaults to the user data dir).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Create a task.
    Add {
        /// Task text.
        text: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long, value_parser = taskdeck_core::parse_date)]
        due: Option<Date>,
        /// Priority: low, medium, or high.
        #[arg(short = 'p', long)]
        priority: Option<Priority>,
        /// Category label.
        #[arg(short = 'c', long)]
        category: Option<String>,
    },

    /// List tasks, newest first.
    Ls,

    /// Toggle a task's completion.
    Done {
        /// Task identifier.
        id: taskdeck_core::TaskId,
    },

    /// Delete a task.
    Rm {
        /// Task identifier.
        id: taskdeck_core::TaskId,
    },

    /// Launch the interactive terminal UI.
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if should_install_tracing(&cli.cmd) {
        install_tracing();
    }

    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    match cli.cmd {
        Command::Serve { addr, data_dir } => {
            let dir = match data_dir {
                Some(dir) => dir,
                None => default_data_dir()?,
            };
            let store = JsonStore::open(&dir)
                .with_context(|| format!("failed to open store at {}", dir.display()))?;
            tokio::runtime::Runtime::new()?.block_on(taskdeck_server::serve(addr, store))
        }

        Command::Tui => {
            let client = ApiClient::new(cli.server);
            let settings = Settings::load().context("failed to load settings")?;
            tui::run(client, settings)
        }

        other => {
            let client = ApiClient::new(cli.server);
            tokio::runtime::Runtime::new()?.block_on(commands::run(other, &client))
        }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("taskdeck").join("tasks"))
        .context("no data directory available; pass --data-dir")
}

const fn should_install_tracing(cmd: &Command) -> bool {
    !matches!(cmd, Command::Tui)
}

fn install_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "taskdeck",
            "add",
            "Buy milk",
            "--due",
            "2025-08-14",
            "--priority",
            "high",
            "--category",
            "Shopping",
        ]);

        match cli.cmd {
            Command::Add {
                text,
                due,
                priority,
                category,
            } => {
                assert_eq!(text, "Buy milk");
                assert_eq!(due, Some(date!(2025 - 08 - 14)));
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(category.as_deref(), Some("Shopping"));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_serve_command() {
        let cli = Cli::parse_from(["taskdeck", "serve", "--addr", "0.0.0.0:8080"]);

        match cli.cmd {
            Command::Serve { addr, data_dir } => {
                assert_eq!(addr.port(), 8080);
                assert!(data_dir.is_none());
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn parse_tui_command_with_server() {
        let cli = Cli::parse_from(["taskdeck", "--server", "http://10.0.0.2:5000", "tui"]);
        assert_eq!(cli.server, "http://10.0.0.2:5000");
        assert!(matches!(cli.cmd, Command::Tui));
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let result = Cli::try_parse_from(["taskdeck", "add", "x", "--due", "not-a-date"]);
        assert!(result.is_err());
    }
}
