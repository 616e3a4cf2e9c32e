//! Application service: configuration use-cases.

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{BtsctlConfig, Installation, ManagementDatabase};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored configuration cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<BtsctlConfig> {
    store.load()
}

/// Save configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be written.
pub fn save_config(store: &impl ConfigStore, config: &BtsctlConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist a single setting, returning the updated configuration.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or persistence fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<BtsctlConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}

/// The management database of the group to manage.
///
/// A complete override in the configuration wins over the registry.
///
/// # Errors
///
/// Returns an error if neither source names both the server and the database.
pub fn management_database(config: &BtsctlConfig, installation: &Installation) -> Result<ManagementDatabase> {
    if let (Some(server), Some(name)) = (
        config.management_database.server.as_deref(),
        config.management_database.name.as_deref(),
    ) {
        return Ok(ManagementDatabase::new(server, name)?);
    }
    let server = installation
        .management_database_server()
        .context("cannot determine the management database server; set management_database.server")?;
    let name = installation
        .management_database_name()
        .context("cannot determine the management database name; set management_database.name")?;
    Ok(ManagementDatabase::new(server, name)?)
}
