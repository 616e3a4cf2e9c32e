//! Domain types and validators for btsctl configuration.
//!
//! Pure functions only: no I/O, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "management_database.server",
    "management_database.name",
    "powershell",
    "wmi.computer",
    "wmi.operation_timeout_secs",
    "probing_paths",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.btsctl/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BtsctlConfig {
    /// Overrides the management database discovered from the registry.
    pub management_database: DatabaseOverride,
    /// PowerShell executable used to reach the management backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powershell: Option<String>,
    /// CIM connection settings.
    pub wmi: WmiConfig,
    /// Extra folders probed when resolving orchestration assemblies.
    pub probing_paths: Vec<String>,
}

/// Management database override; both fields must be set to take effect.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// CIM connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WmiConfig {
    /// Host running the BizTalk management provider; `.` is the local machine.
    pub computer: String,
    /// Transport timeout handed to the CIM cmdlets.
    pub operation_timeout_secs: u32,
}

impl Default for WmiConfig {
    fn default() -> Self {
        Self {
            computer: ".".to_string(),
            operation_timeout_secs: 60,
        }
    }
}

impl BtsctlConfig {
    /// PowerShell executable, falling back to the platform default.
    #[must_use]
    pub fn powershell(&self) -> &str {
        self.powershell.as_deref().unwrap_or(if cfg!(windows) {
            "powershell.exe"
        } else {
            "pwsh"
        })
    }

    /// Assign a validated key/value pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "management_database.server" => {
                self.management_database.server = Some(value.to_string());
            }
            "management_database.name" => self.management_database.name = Some(value.to_string()),
            "powershell" => self.powershell = Some(value.to_string()),
            "wmi.computer" => value.clone_into(&mut self.wmi.computer),
            "wmi.operation_timeout_secs" => {
                self.wmi.operation_timeout_secs = value.parse()?;
            }
            "probing_paths" => self.probing_paths = split_paths(value),
            _ => unreachable!("key validated above"),
        }
        Ok(())
    }
}

fn split_paths(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |hint: &str| -> Result<()> {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            hint: hint.to_string(),
        }
        .into())
    };
    match key {
        "wmi.operation_timeout_secs" => match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(()),
            _ => invalid("Expected a positive number of seconds."),
        },
        "probing_paths" => Ok(()),
        _ if value.trim().is_empty() => invalid("Value must not be empty."),
        _ => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
