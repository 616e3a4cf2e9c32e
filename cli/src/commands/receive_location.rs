//! `btsctl receive-location`: enable or disable a receive location.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::explorer::Application;
use crate::output::progress::with_spinner;

/// Selects a receive location of a receive port.
#[derive(Args, Debug, Clone)]
pub struct ReceiveLocationTarget {
    /// Application the receive port belongs to
    #[arg(long, short = 'a')]
    pub application: String,

    /// Receive port owning the location
    #[arg(long, short = 'p')]
    pub receive_port: String,

    /// Receive location name
    pub name: String,
}

/// Receive location subcommands.
#[derive(Subcommand, Debug)]
pub enum ReceiveLocationCommand {
    /// Show whether the receive location is enabled
    Status(ReceiveLocationTarget),
    /// Enable the receive location
    Enable(ReceiveLocationTarget),
    /// Disable the receive location
    Disable(ReceiveLocationTarget),
}

/// Run the receive-location command.
///
/// # Errors
///
/// Returns `NotFound` for a missing application, port or location, and the
/// catalog error if the change cannot be saved.
pub fn run(app: &AppContext, cmd: &ReceiveLocationCommand) -> Result<ExitCode> {
    let (target, wanted) = match cmd {
        ReceiveLocationCommand::Status(t) => (t, None),
        ReceiveLocationCommand::Enable(t) => (t, Some(true)),
        ReceiveLocationCommand::Disable(t) => (t, Some(false)),
    };
    let catalog = app.catalog()?;
    let application = with_spinner(
        app.output.show_progress(),
        &format!("Loading application '{}'...", target.application),
        || Application::load(&catalog, &target.application),
    )?;
    let mut location = application.receive_location(&target.receive_port, &target.name)?;
    let before = location.is_enabled()?;

    let Some(enabled) = wanted else {
        app.renderer().render_receive_location_status(
            application.name(),
            &target.receive_port,
            location.name(),
            before,
        )?;
        return Ok(ExitCode::SUCCESS);
    };

    let reporter = app.reporter();
    let action = if enabled { "Enabling" } else { "Disabling" };
    reporter.step(&format!("{action} receive location '{}'...", location.name()));
    if enabled {
        location.enable()?;
    } else {
        location.disable()?;
    }
    let after = location.is_enabled()?;
    app.renderer()
        .render_receive_location_change(location.name(), before, after)?;
    Ok(ExitCode::SUCCESS)
}
