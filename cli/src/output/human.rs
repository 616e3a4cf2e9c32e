//! Human-readable terminal renderer.

use std::path::Path;

use btsctl_common::{OrchestrationStatus, PortStatus};
use owo_colors::OwoColorize as _;

use crate::application::services::lifecycle::{LifecycleVerb, Transition};
use crate::domain::{BtsctlConfig, Installation, ManagementDatabase, OrchestrationType};
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Status lines go to stdout even under `--quiet`; they are the result.
    pub fn render_orchestration_status(&self, orchestration: &OrchestrationType, status: OrchestrationStatus) {
        println!(
            "  {}  {}",
            orchestration.full_name().style(self.ctx.styles.bold),
            stage_label(&status.to_string(), status == OrchestrationStatus::Started, self.ctx)
        );
        self.ctx.kv("Assembly:", &orchestration.assembly().to_string());
    }

    pub fn render_send_port_status(&self, application: &str, name: &str, status: PortStatus) {
        let label = status.to_string().to_lowercase();
        println!(
            "  {}  {}",
            name.style(self.ctx.styles.bold),
            stage_label(&label, status == PortStatus::Started, self.ctx)
        );
        self.ctx.kv("Application:", application);
    }

    pub fn render_receive_location_status(
        &self,
        application: &str,
        receive_port: &str,
        name: &str,
        enabled: bool,
    ) {
        let label = if enabled { "enabled" } else { "disabled" };
        println!(
            "  {}  {}",
            name.style(self.ctx.styles.bold),
            stage_label(label, enabled, self.ctx)
        );
        self.ctx.kv("Receive port:", receive_port);
        self.ctx.kv("Application:", application);
    }

    /// Progress lines already report the outcome; only add a hint for no-ops.
    pub fn render_transition(&self, resource: &str, verb: LifecycleVerb, transition: &Transition) {
        if !transition.changed() {
            self.ctx
                .info(&format!("{} left {resource} unchanged", verb.name()));
        }
    }

    pub fn render_receive_location_change(&self, name: &str, before: bool, after: bool) {
        let state = if after { "enabled" } else { "disabled" };
        if before == after {
            self.ctx
                .info(&format!("receive location '{name}' already {state}"));
        } else {
            self.ctx.success(&format!("receive location '{name}' {state}"));
        }
    }

    pub fn render_info(&self, installation: &Installation, database: Option<&ManagementDatabase>) {
        println!();
        println!("  {}", "BizTalk Server".style(self.ctx.styles.header));
        println!();
        if !installation.is_installed() {
            self.ctx.warn("BizTalk Server is not installed on this machine.");
        }
        let show = |key: &str, value: Option<String>| {
            println!(
                "  {:<24} {}",
                key,
                value.unwrap_or_else(|| "(unknown)".style(self.ctx.styles.dim).to_string())
            );
        };
        show("Installation path:", installation.installation_path.clone());
        show("Developer tools path:", installation.developer_tools_path.clone());
        show("Pipeline tools path:", installation.pipeline_tools_path().ok());
        show("SQL scripts path:", installation.sql_scripts_path.clone());
        show("Management database:", database.map(ToString::to_string));
        println!();
    }

    pub fn render_config(&self, config: &BtsctlConfig, path: &Path) {
        let unset = || "(not set)".to_string();
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<30} {}",
            "management_database.server:",
            config.management_database.server.clone().unwrap_or_else(unset)
        );
        println!(
            "  {:<30} {}",
            "management_database.name:",
            config.management_database.name.clone().unwrap_or_else(unset)
        );
        println!("  {:<30} {}", "powershell:", config.powershell());
        println!("  {:<30} {}", "wmi.computer:", config.wmi.computer);
        println!(
            "  {:<30} {}",
            "wmi.operation_timeout_secs:", config.wmi.operation_timeout_secs
        );
        let probing = if config.probing_paths.is_empty() {
            unset()
        } else {
            config.probing_paths.join(";")
        };
        println!("  {:<30} {probing}", "probing_paths:");
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["BTSCTL_CONFIG", "BTSCTL_YES", "NO_COLOR", "RUST_LOG"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| unset())
            );
        }
        println!();
    }
}

fn stage_label(label: &str, active: bool, ctx: &OutputContext) -> String {
    if active {
        label.style(ctx.styles.success).to_string()
    } else {
        label.style(ctx.styles.warning).to_string()
    }
}
