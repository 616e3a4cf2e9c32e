//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags, OutputMode};
use crate::commands;
use crate::domain::LifecycleError;

/// Exit status for a rejected transition the caller may retry after re-querying.
pub const EXIT_INVALID_TRANSITION: u8 = 3;

/// Lifecycle control for BizTalk Server orchestrations, send ports and receive locations
#[derive(Parser, Debug)]
#[command(
    name = "btsctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not prompt before destructive operations
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Control an orchestration
    #[command(subcommand)]
    Orchestration(commands::orchestration::OrchestrationCommand),

    /// Control a send port
    #[command(subcommand)]
    SendPort(commands::send_port::SendPortCommand),

    /// Enable or disable a receive location
    #[command(subcommand)]
    ReceiveLocation(commands::receive_location::ReceiveLocationCommand),

    /// Show the local BizTalk Server installation
    Info,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing command.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
            ..
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        };
        let context = || AppContext::new(&flags);
        match &command {
            Command::Orchestration(cmd) => commands::orchestration::run(&context()?, cmd),
            Command::SendPort(cmd) => commands::send_port::run(&context()?, cmd),
            Command::ReceiveLocation(cmd) => commands::receive_location::run(&context()?, cmd),
            Command::Info => commands::info::run(&context()?),
            Command::Config(cmd) => commands::config::run(&context()?, cmd),
            Command::Version => {
                commands::version::run(if json { OutputMode::Json } else { OutputMode::Human });
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Machine-readable code and process exit status for a failed command.
#[must_use]
pub fn failure(err: &anyhow::Error) -> (&'static str, u8) {
    match err.downcast_ref::<LifecycleError>() {
        Some(e) if e.is_retryable() => (e.code(), EXIT_INVALID_TRANSITION),
        Some(e) => (e.code(), 1),
        None => ("error", 1),
    }
}
