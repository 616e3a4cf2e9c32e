//! `btsctl orchestration`: drive one orchestration through its lifecycle.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use btsctl_common::{AutoFlag, StartFlags, StopFlags, UnenlistFlags};
use clap::{Args, Subcommand};
use tracing::debug;

use crate::app::AppContext;
use crate::application::ports::{CatalogExplorer, FileProbe, TypeInspector};
use crate::application::services::explorer::Application;
use crate::application::services::lifecycle::{self, LifecycleVerb, ManagedResource, OrchestrationController};
use crate::application::services::resolver::AssemblyResolver;
use crate::domain::{AssemblyName, TypeDescriptor};
use crate::output::progress::with_spinner;

/// Selects an orchestration through the catalog or through its assembly.
#[derive(Args, Debug, Clone)]
pub struct OrchestrationTarget {
    /// Application deploying the orchestration
    #[arg(long, short = 'a', requires = "name", conflicts_with_all = ["assembly", "type_name"])]
    pub application: Option<String>,

    /// Full type name of the orchestration within --application
    #[arg(long, requires = "application")]
    pub name: Option<String>,

    /// Display name of the assembly defining the orchestration
    #[arg(long, requires = "type_name")]
    pub assembly: Option<String>,

    /// Full type name of the orchestration within --assembly
    #[arg(long = "type", requires = "assembly")]
    pub type_name: Option<String>,
}

/// Overrides for the `Start` method flags.
#[derive(Args, Debug, Clone, Default)]
pub struct StartOverrides {
    /// Enable the receive locations the orchestration subscribes through
    #[arg(long, value_enum)]
    pub auto_enable_receive_locations: Option<AutoFlag>,
    /// Resume suspended instances
    #[arg(long, value_enum)]
    pub auto_resume_instances: Option<AutoFlag>,
    /// Start the send ports the orchestration is bound to
    #[arg(long, value_enum)]
    pub auto_start_send_ports: Option<AutoFlag>,
}

impl StartOverrides {
    fn apply(&self, base: StartFlags) -> StartFlags {
        StartFlags {
            auto_enable_receive_locations: self
                .auto_enable_receive_locations
                .unwrap_or(base.auto_enable_receive_locations),
            auto_resume_instances: self.auto_resume_instances.unwrap_or(base.auto_resume_instances),
            auto_start_send_ports: self.auto_start_send_ports.unwrap_or(base.auto_start_send_ports),
        }
    }
}

/// Overrides for the `Stop` method flags.
#[derive(Args, Debug, Clone, Default)]
pub struct StopOverrides {
    /// Disable the receive locations the orchestration subscribes through
    #[arg(long, value_enum)]
    pub auto_disable_receive_locations: Option<AutoFlag>,
    /// Suspend running instances
    #[arg(long, value_enum)]
    pub auto_suspend_instances: Option<AutoFlag>,
}

impl StopOverrides {
    fn apply(&self, base: StopFlags) -> StopFlags {
        StopFlags {
            auto_disable_receive_locations: self
                .auto_disable_receive_locations
                .unwrap_or(base.auto_disable_receive_locations),
            auto_suspend_instances: self.auto_suspend_instances.unwrap_or(base.auto_suspend_instances),
        }
    }
}

/// Overrides for the `Unenlist` method flag.
#[derive(Args, Debug, Clone, Default)]
pub struct UnenlistOverrides {
    /// Terminate every instance of the orchestration
    #[arg(long, value_enum)]
    pub auto_terminate_instances: Option<AutoFlag>,
}

impl UnenlistOverrides {
    fn apply(&self, base: UnenlistFlags) -> UnenlistFlags {
        UnenlistFlags {
            auto_terminate_instances: self.auto_terminate_instances.unwrap_or(base.auto_terminate_instances),
        }
    }
}

/// Orchestration subcommands.
#[derive(Subcommand, Debug)]
pub enum OrchestrationCommand {
    /// Show the orchestration status
    Status(OrchestrationTarget),
    /// Enlist an unenlisted orchestration
    Enlist(OrchestrationTarget),
    /// Start an enlisted orchestration
    Start {
        #[command(flatten)]
        target: OrchestrationTarget,
        #[command(flatten)]
        flags: StartOverrides,
    },
    /// Stop a started orchestration
    Stop {
        #[command(flatten)]
        target: OrchestrationTarget,
        #[command(flatten)]
        flags: StopOverrides,
    },
    /// Unenlist a stopped orchestration
    Unenlist {
        #[command(flatten)]
        target: OrchestrationTarget,
        #[command(flatten)]
        flags: UnenlistOverrides,
    },
    /// Enlist if needed, then start
    EnsureStarted(OrchestrationTarget),
    /// Stop if started
    EnsureNotStarted(OrchestrationTarget),
    /// Stop if needed, then unenlist
    EnsureUnenlisted(OrchestrationTarget),
    /// Enlist if unenlisted
    EnsureNotUnenlisted(OrchestrationTarget),
}

impl OrchestrationCommand {
    fn target(&self) -> &OrchestrationTarget {
        match self {
            Self::Status(target)
            | Self::Enlist(target)
            | Self::EnsureStarted(target)
            | Self::EnsureNotStarted(target)
            | Self::EnsureUnenlisted(target)
            | Self::EnsureNotUnenlisted(target)
            | Self::Start { target, .. }
            | Self::Stop { target, .. }
            | Self::Unenlist { target, .. } => target,
        }
    }

    /// `None` for `status`.
    fn verb(&self) -> Option<LifecycleVerb> {
        match self {
            Self::Status(_) => None,
            Self::Enlist(_) => Some(LifecycleVerb::Enlist),
            Self::Start { .. } => Some(LifecycleVerb::Start),
            Self::Stop { .. } => Some(LifecycleVerb::Stop),
            Self::Unenlist { .. } => Some(LifecycleVerb::Unenlist),
            Self::EnsureStarted(_) => Some(LifecycleVerb::EnsureStarted),
            Self::EnsureNotStarted(_) => Some(LifecycleVerb::EnsureNotStarted),
            Self::EnsureUnenlisted(_) => Some(LifecycleVerb::EnsureUnenlisted),
            Self::EnsureNotUnenlisted(_) => Some(LifecycleVerb::EnsureNotUnenlisted),
        }
    }
}

/// Run the orchestration command.
///
/// # Errors
///
/// Returns the lifecycle error of the failing step, or an error if the
/// orchestration cannot be located.
pub fn run(app: &AppContext, cmd: &OrchestrationCommand) -> Result<ExitCode> {
    let descriptor = with_spinner(app.output.show_progress(), "Locating orchestration...", || {
        locate(app, cmd.target())
    })?;

    let backend = app.management_backend();
    let bound = OrchestrationController::new(&backend, descriptor, &app.config.wmi.computer)?;
    let mut controller = match cmd {
        OrchestrationCommand::Start { flags, .. } => {
            bound.with_start_flags(flags.apply(StartFlags::AUTOMATIC))
        }
        OrchestrationCommand::Stop { flags, .. } => {
            bound.with_stop_flags(flags.apply(StopFlags::WMI_DEFAULT))
        }
        OrchestrationCommand::Unenlist { flags, .. } => {
            bound.with_unenlist_flags(flags.apply(UnenlistFlags::TERMINATE))
        }
        _ => bound,
    };

    let Some(verb) = cmd.verb() else {
        let status = controller.status()?;
        app.renderer()
            .render_orchestration_status(controller.orchestration(), status)?;
        return Ok(ExitCode::SUCCESS);
    };

    if verb.is_destructive() {
        let prompt = format!(
            "Unenlisting {} may terminate its running instances. Continue?",
            controller.describe()
        );
        if !app.non_interactive && !app.confirm(&prompt, false)? {
            app.output.info("Aborted.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let transition = lifecycle::apply(&mut controller, verb, &app.reporter())?;
    app.renderer()
        .render_transition(&controller.describe(), verb, &transition)?;
    Ok(ExitCode::SUCCESS)
}

fn locate(app: &AppContext, target: &OrchestrationTarget) -> Result<TypeDescriptor> {
    match target {
        OrchestrationTarget {
            application: Some(application),
            name: Some(name),
            ..
        } => from_catalog(&app.catalog()?, application, name),
        OrchestrationTarget {
            assembly: Some(assembly),
            type_name: Some(type_name),
            ..
        } => from_assembly(
            &app.assembly_resolver(),
            &app.type_inspector(),
            assembly,
            type_name,
        ),
        _ => bail!("Specify the orchestration with --application and --name, or --assembly and --type."),
    }
}

/// Type identity of an orchestration deployed in `application`.
///
/// # Errors
///
/// Returns `NotFound` if the application or the orchestration is missing.
pub fn from_catalog(catalog: &impl CatalogExplorer, application: &str, name: &str) -> Result<TypeDescriptor> {
    let application = Application::load(catalog, application)?;
    Ok(application.orchestrations().get(name)?.descriptor())
}

/// Type identity of `type_name`, reflected from the assembly found by `resolver`.
///
/// # Errors
///
/// Returns an error if the assembly name is malformed or cannot be located,
/// or if the type cannot be described.
pub fn from_assembly<F: FileProbe>(
    resolver: &AssemblyResolver<'_, F>,
    inspector: &impl TypeInspector,
    assembly: &str,
    type_name: &str,
) -> Result<TypeDescriptor> {
    let assembly: AssemblyName = assembly.parse()?;
    debug!(%assembly, type_name, "resolving orchestration type");
    let described = resolver
        .resolve_and_load(&assembly, |path| {
            inspector.describe(path, type_name, resolver.policy())
        })
        .with_context(|| {
            format!(
                "cannot locate assembly '{}' in {}",
                assembly.name,
                probing_summary(resolver.probing_paths())
            )
        })?;
    Ok(described?)
}

fn probing_summary(paths: &[String]) -> String {
    if paths.is_empty() {
        "any probing folder (none configured; set probing_paths)".to_string()
    } else {
        paths.join(", ")
    }
}
