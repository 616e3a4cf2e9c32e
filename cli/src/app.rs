//! Application context: unified state passed to every command handler.
//!
//! Configuration and installation facts are loaded once here and borrowed by
//! every adapter a command builds.

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::ports::InstallationSource;
use crate::application::services::config_service;
use crate::application::services::resolver::AssemblyResolver;
use crate::domain::{BtsctlConfig, Installation, ManagementDatabase};
use crate::infra::command_runner::ProcessCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::explorer_om::ExplorerOmCatalog;
use crate::infra::fs::LocalFs;
use crate::infra::installation::RegistryInstallationSource;
use crate::infra::type_inspector::ReflectionInspector;
use crate::infra::wmi::CimBackend;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `BTSCTL_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Where the configuration lives.
    pub config_store: YamlConfigStore,
    /// Configuration loaded at startup.
    pub config: BtsctlConfig,
    /// Local BizTalk Server installation, empty when not installed.
    pub installation: Installation,
    /// Process runner shared by every adapter.
    pub runner: ProcessCommandRunner,
    /// Filesystem probe for assembly resolution.
    pub files: LocalFs,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `BTSCTL_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("BTSCTL_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore;
        let config = config_service::load_config(&config_store)?;
        let runner = ProcessCommandRunner;
        let installation = discover_installation(&runner);

        Ok(Self {
            // JSON documents own stdout; progress lines would corrupt them.
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            config_store,
            config,
            installation,
            runner,
            files: LocalFs,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `BTSCTL_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    /// The management database named by config or the installation.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source names both server and database.
    pub fn management_database(&self) -> Result<ManagementDatabase> {
        config_service::management_database(&self.config, &self.installation)
    }

    #[must_use]
    pub fn management_backend(&self) -> CimBackend<'_, ProcessCommandRunner> {
        CimBackend::new(
            &self.runner,
            self.config.powershell(),
            self.config.wmi.operation_timeout_secs,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the management database cannot be determined.
    pub fn catalog(&self) -> Result<ExplorerOmCatalog<'_, ProcessCommandRunner>> {
        Ok(ExplorerOmCatalog::new(
            &self.runner,
            self.config.powershell(),
            self.management_database()?,
        ))
    }

    #[must_use]
    pub fn type_inspector(&self) -> ReflectionInspector<'_, ProcessCommandRunner> {
        ReflectionInspector::new(&self.runner, self.config.powershell())
    }

    #[must_use]
    pub fn assembly_resolver(&self) -> AssemblyResolver<'_, LocalFs> {
        AssemblyResolver::new(&self.files, &self.installation, &self.config.probing_paths)
    }
}

/// BizTalk Server only installs on Windows; elsewhere the registry is not consulted.
fn discover_installation(runner: &ProcessCommandRunner) -> Installation {
    if !cfg!(windows) {
        debug!("not on Windows, skipping installation discovery");
        return Installation::default();
    }
    RegistryInstallationSource::new(runner)
        .discover()
        .unwrap_or_else(|e| {
            warn!("cannot query the BizTalk Server registry key: {e:#}");
            Installation::default()
        })
}
