//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.
//!
//! Lifecycle ports return `LifecycleError` so every error kind reaches the
//! caller intact; the ambient ports (config, installation) use `anyhow`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use btsctl_common::PortStatus;

use crate::domain::{
    ApplicationRecord, BtsctlConfig, Installation, LifecycleError, ManagementDatabase,
    ManagementPath, ProbingPolicy, TypeDescriptor,
};

// ── Management Backend Ports ──────────────────────────────────────────────────

/// One acquired remote management object.
///
/// A session is a snapshot: properties reflect the object at acquisition time.
/// Callers re-acquire after every mutating call to observe its effect.
pub trait ManagementSession {
    /// Read a property of the snapshot, rendered as text.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::BackendUnavailable` if the property is absent.
    fn property(&self, name: &str) -> Result<String, LifecycleError>;

    /// Invoke a method on the remote object with `u32` arguments.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidTransition` when the backend rejects the
    /// call and `LifecycleError::BackendUnavailable` when it cannot be reached.
    fn invoke(&mut self, method: &'static str, args: &[(&str, u32)]) -> Result<(), LifecycleError>;

    /// Release the remote object. Calling it more than once is a no-op.
    fn release(&mut self);
}

/// Acquires management objects by path.
pub trait ManagementBackend {
    type Session<'a>: ManagementSession
    where
        Self: 'a;

    /// Fetch the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::BackendUnavailable` if the object cannot be fetched.
    fn acquire(&self, path: &ManagementPath) -> Result<Self::Session<'_>, LifecycleError>;
}

// ── Catalog Ports ─────────────────────────────────────────────────────────────

/// Read and write access to the BizTalk configuration catalog of one group.
pub trait CatalogExplorer {
    /// The management database identifying the group.
    fn management_database(&self) -> &ManagementDatabase;

    /// Load a fresh snapshot of an application.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::NotFound` if the group has no such application.
    fn application(&self, name: &str) -> Result<ApplicationRecord, LifecycleError>;

    /// Assign a send port status and save the change.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidTransition` if the catalog refuses the change.
    fn apply_send_port_status(
        &self,
        application: &str,
        send_port: &str,
        status: PortStatus,
    ) -> Result<(), LifecycleError>;

    /// Assign a receive location enabled flag and save the change.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidTransition` if the catalog refuses the change.
    fn apply_receive_location_enabled(
        &self,
        application: &str,
        receive_port: &str,
        receive_location: &str,
        enabled: bool,
    ) -> Result<(), LifecycleError>;
}

// ── Type Resolution Ports ─────────────────────────────────────────────────────

/// Loads assemblies and describes the types they define.
pub trait TypeInspector {
    /// Describe `type_name` from the assembly at `assembly_path`.
    ///
    /// Dependencies of the assembly are resolved under `probing`.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidArgument` if the type does not exist and
    /// `LifecycleError::BackendUnavailable` if the assembly cannot be loaded.
    fn describe(
        &self,
        assembly_path: &Path,
        type_name: &str,
        probing: &ProbingPolicy,
    ) -> Result<TypeDescriptor, LifecycleError>;
}

/// Answers whether a probed file exists.
pub trait FileProbe {
    fn is_file(&self, path: &Path) -> bool;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Blocking: each call returns once the child has exited.
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Ambient Ports ─────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored configuration cannot be read or parsed.
    fn load(&self) -> Result<BtsctlConfig>;

    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    fn save(&self, config: &BtsctlConfig) -> Result<()>;

    /// Location of the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

/// Discovers the local BizTalk Server installation.
pub trait InstallationSource {
    /// # Errors
    ///
    /// Returns an error if the installation facts cannot be queried.
    fn discover(&self) -> Result<Installation>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
