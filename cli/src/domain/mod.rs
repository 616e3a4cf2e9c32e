//! Domain layer: pure types, identities and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod installation;

pub use catalog::{
    ApplicationRecord, OrchestrationEntry, ReceiveLocationEntry, ReceivePortEntry, SendPortEntry,
};
pub use config::{BtsctlConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, InstallationError, LifecycleError};
pub use identity::{AssemblyName, ManagementPath, OrchestrationType, ProbingPolicy, TypeDescriptor};
pub use installation::{Installation, ManagementDatabase};
