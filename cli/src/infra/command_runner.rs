//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `ProcessCommandRunner` spawns child processes with `std::process` and blocks
//! until they exit. Timeouts are left to the programs themselves.

use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use tracing::trace;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        trace!(program, ?args, "spawning");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn {program}"))
    }
}
