//! CLI entry point for taskdeck.

use std::net::IpAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use taskdeck_app::{HttpTasksApi, LocalMirror, TaskRepository};
use taskdeck_server::ServerConfig;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod tui;

/// Minimal task tracking against a local REST API.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: create, complete, and clear short text tasks over HTTP"
)]
struct Cli {
    /// Base URL of the API server.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API server.
    Serve {
        /// Interface to bind.
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,
        /// TCP port to listen on.
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },

    /// Launch the interactive terminal UI.
    Tui,

    /// List all tasks.
    Ls,

    /// Create a task.
    Add {
        /// Task title, 1–100 characters.
        title: String,
    },

    /// Mark a task completed.
    Done {
        /// Task id.
        id: u64,
    },

    /// Mark a task not completed.
    Reopen {
        /// Task id.
        id: u64,
    },

    /// Replace a task's title.
    Rename {
        /// Task id.
        id: u64,
        /// New title, 1–100 characters.
        title: String,
    },

    /// Delete a task.
    Rm {
        /// Task id.
        id: u64,
    },

    /// Remove every completed task.
    Clear,
}

fn main() -> Result<()> {
    let Cli { server, cmd } = Cli::parse();

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    execute_command(&server, cmd)
}

fn execute_command(server_url: &str, command: Command) -> Result<()> {
    match command {
        Command::Serve { bind, port } => {
            let config = ServerConfig { bind, port };
            tokio::runtime::Runtime::new()?.block_on(taskdeck_server::serve(config))
        }

        Command::Tui => tui::run(frontend_repository(server_url)),

        other => commands::run(other, &mut frontend_repository(server_url)),
    }
}

fn frontend_repository(server_url: &str) -> TaskRepository<HttpTasksApi> {
    TaskRepository::new(HttpTasksApi::new(server_url), LocalMirror::discover())
}

// The TUI owns the terminal in raw mode; log lines would garble it.
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

    #[test]
    fn parse_serve_command() {
        let cli = Cli::parse_from(["taskdeck", "serve", "--port", "8080"]);
        match cli.cmd {
            Command::Serve { bind, port } => {
                assert_eq!(bind.to_string(), "127.0.0.1");
                assert_eq!(port, 8080);
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn parse_add_command_with_server_override() {
        let cli = Cli::parse_from([
            "taskdeck",
            "--server",
            "http://127.0.0.1:9000",
            "add",
            "Buy milk",
        ]);
        assert_eq!(cli.server, "http://127.0.0.1:9000");
        match cli.cmd {
            Command::Add { title } => assert_eq!(title, "Buy milk"),
            other => panic!("expected add command, got {other:?}"),
        }
    }

    #[test]
    fn parse_rename_command() {
        let cli = Cli::parse_from(["taskdeck", "rename", "3", "Walk dog"]);
        match cli.cmd {
            Command::Rename { id, title } => {
                assert_eq!(id, 3);
                assert_eq!(title, "Walk dog");
            }
            other => panic!("expected rename command, got {other:?}"),
        }
    }

    #[test]
    fn skips_tracing_in_tui_mode() {
        assert!(!should_install_tracing(&Command::Tui));
        assert!(should_install_tracing(&Command::Ls));
    }
}
