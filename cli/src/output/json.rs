//! JSON output helpers.
//!
//! `JsonRenderer` builds the machine-readable documents printed under
//! `--json`; `format_error` is the error object every failing command emits.

use std::path::Path;

use anyhow::{Context, Result};
use btsctl_common::{OrchestrationStatus, PortStatus};
use serde_json::{Value, json};

use crate::application::services::lifecycle::{LifecycleVerb, Transition};
use crate::domain::{BtsctlConfig, Installation, ManagementDatabase, OrchestrationType};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders command results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn emit(value: &Value) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_orchestration_status(
        orchestration: &OrchestrationType,
        status: OrchestrationStatus,
    ) -> Result<()> {
        Self::emit(&orchestration_status(orchestration, status))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_send_port_status(application: &str, name: &str, status: PortStatus) -> Result<()> {
        Self::emit(&json!({
            "resource": "send-port",
            "application": application,
            "name": name,
            "status": status,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_receive_location_status(
        application: &str,
        receive_port: &str,
        name: &str,
        enabled: bool,
    ) -> Result<()> {
        Self::emit(&json!({
            "resource": "receive-location",
            "application": application,
            "receive_port": receive_port,
            "name": name,
            "enabled": enabled,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_transition(resource: &str, verb: LifecycleVerb, transition: &Transition) -> Result<()> {
        Self::emit(&transition_document(resource, verb, transition))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_receive_location_change(name: &str, before: bool, after: bool) -> Result<()> {
        Self::emit(&json!({
            "resource": format!("receive location '{name}'"),
            "before": { "enabled": before },
            "after": { "enabled": after },
            "changed": before != after,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_info(installation: &Installation, database: Option<&ManagementDatabase>) -> Result<()> {
        Self::emit(&info_document(installation, database))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(config: &BtsctlConfig, path: &Path) -> Result<()> {
        Self::emit(&json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }
}

fn orchestration_status(orchestration: &OrchestrationType, status: OrchestrationStatus) -> Value {
    json!({
        "resource": "orchestration",
        "name": orchestration.full_name(),
        "assembly": orchestration.assembly().to_string(),
        "status": status,
    })
}

fn transition_document(resource: &str, verb: LifecycleVerb, transition: &Transition) -> Value {
    json!({
        "resource": resource,
        "verb": verb.name(),
        "before": transition.before,
        "after": transition.after,
        "changed": transition.changed(),
    })
}

fn info_document(installation: &Installation, database: Option<&ManagementDatabase>) -> Value {
    json!({
        "installed": installation.is_installed(),
        "configured": installation.is_configured(),
        "installation_path": installation.installation_path,
        "developer_tools_path": installation.developer_tools_path,
        "pipeline_tools_path": installation.pipeline_tools_path().ok(),
        "sql_scripts_path": installation.sql_scripts_path,
        "management_database": database.map(ToString::to_string),
    })
}
