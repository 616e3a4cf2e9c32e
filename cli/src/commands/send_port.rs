//! `btsctl send-port`: drive one send port through its lifecycle.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::explorer::Application;
use crate::application::services::lifecycle::{self, LifecycleVerb, ManagedResource};
use crate::output::progress::with_spinner;

/// Selects a send port of an application.
#[derive(Args, Debug, Clone)]
pub struct SendPortTarget {
    /// Application the send port belongs to
    #[arg(long, short = 'a')]
    pub application: String,

    /// Send port name
    pub name: String,
}

/// Send port subcommands.
#[derive(Subcommand, Debug)]
pub enum SendPortCommand {
    /// Show the send port status
    Status(SendPortTarget),
    /// Bind a send port to its subscriptions (Bound to Stopped)
    Enlist(SendPortTarget),
    /// Start the send port
    Start(SendPortTarget),
    /// Stop the send port
    Stop(SendPortTarget),
    /// Unbind a stopped send port (Stopped to Bound)
    Unenlist(SendPortTarget),
    /// Enlist if needed, then start
    EnsureStarted(SendPortTarget),
    /// Stop if started
    EnsureNotStarted(SendPortTarget),
    /// Stop if needed, then unenlist
    EnsureUnenlisted(SendPortTarget),
    /// Enlist if bound
    EnsureNotUnenlisted(SendPortTarget),
}

impl SendPortCommand {
    fn split(&self) -> (&SendPortTarget, Option<LifecycleVerb>) {
        match self {
            Self::Status(t) => (t, None),
            Self::Enlist(t) => (t, Some(LifecycleVerb::Enlist)),
            Self::Start(t) => (t, Some(LifecycleVerb::Start)),
            Self::Stop(t) => (t, Some(LifecycleVerb::Stop)),
            Self::Unenlist(t) => (t, Some(LifecycleVerb::Unenlist)),
            Self::EnsureStarted(t) => (t, Some(LifecycleVerb::EnsureStarted)),
            Self::EnsureNotStarted(t) => (t, Some(LifecycleVerb::EnsureNotStarted)),
            Self::EnsureUnenlisted(t) => (t, Some(LifecycleVerb::EnsureUnenlisted)),
            Self::EnsureNotUnenlisted(t) => (t, Some(LifecycleVerb::EnsureNotUnenlisted)),
        }
    }
}

/// Run the send-port command.
///
/// # Errors
///
/// Returns the lifecycle error of the failing step, or an error if the
/// management database cannot be determined.
pub fn run(app: &AppContext, cmd: &SendPortCommand) -> Result<ExitCode> {
    let (target, verb) = cmd.split();
    let catalog = app.catalog()?;
    let application = with_spinner(
        app.output.show_progress(),
        &format!("Loading application '{}'...", target.application),
        || Application::load(&catalog, &target.application),
    )?;
    let mut port = application.send_port(&target.name)?;

    let Some(verb) = verb else {
        let status = port.status()?;
        app.renderer()
            .render_send_port_status(application.name(), port.name(), status)?;
        return Ok(ExitCode::SUCCESS);
    };

    let transition = lifecycle::apply(&mut port, verb, &app.reporter())?;
    app.renderer()
        .render_transition(&port.describe(), verb, &transition)?;
    Ok(ExitCode::SUCCESS)
}
