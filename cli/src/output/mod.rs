//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use btsctl_common::{OrchestrationStatus, PortStatus};
use console::Term;
use owo_colors::OwoColorize as _;

use crate::application::services::lifecycle::{LifecycleVerb, Transition};
use crate::domain::{BtsctlConfig, Installation, ManagementDatabase, OrchestrationType};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Renderer for the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_orchestration_status(
        &self,
        orchestration: &OrchestrationType,
        status: OrchestrationStatus,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_orchestration_status(orchestration, status);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_orchestration_status(orchestration, status),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_send_port_status(&self, application: &str, name: &str, status: PortStatus) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_send_port_status(application, name, status);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_send_port_status(application, name, status),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_receive_location_status(
        &self,
        application: &str,
        receive_port: &str,
        name: &str,
        enabled: bool,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_receive_location_status(application, receive_port, name, enabled);
                Ok(())
            }
            Self::Json(_) => {
                JsonRenderer::render_receive_location_status(application, receive_port, name, enabled)
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_transition(&self, resource: &str, verb: LifecycleVerb, transition: &Transition) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_transition(resource, verb, transition);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_transition(resource, verb, transition),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_receive_location_change(&self, name: &str, before: bool, after: bool) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_receive_location_change(name, before, after);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_receive_location_change(name, before, after),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_info(&self, installation: &Installation, database: Option<&ManagementDatabase>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_info(installation, database);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_info(installation, database),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &BtsctlConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_config(config, path),
        }
    }
}
