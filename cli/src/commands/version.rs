//! Version command

use crate::app::OutputMode;

/// Run the version command.
///
/// Needs no configuration, so it runs before `AppContext` is built.
pub fn run(mode: OutputMode) {
    let version = env!("CARGO_PKG_VERSION");

    match mode {
        OutputMode::Json => println!(r#"{{"version":"{version}"}}"#),
        OutputMode::Human => println!("{} {version}", env!("CARGO_PKG_NAME")),
    }
}
