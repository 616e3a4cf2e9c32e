//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, registry queries and the PowerShell-hosted BizTalk adapters.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod explorer_om;
pub mod fs;
pub mod installation;
pub mod powershell;
pub mod type_inspector;
pub mod wmi;

#[cfg(test)]
pub(crate) mod test_support;
