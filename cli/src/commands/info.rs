//! `btsctl info`: show the discovered BizTalk Server installation.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run the info command.
///
/// # Errors
///
/// Returns an error if the output cannot be rendered.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    // A missing database is reported as unknown rather than failing the command.
    let database = app.management_database().ok();
    app.renderer()
        .render_info(&app.installation, database.as_ref())?;
    Ok(ExitCode::SUCCESS)
}
