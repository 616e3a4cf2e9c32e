//! Facts about the local BizTalk Server installation and its management database.
//!
//! Values are discovered once (see `infra::installation`) and passed around
//! explicitly; nothing here reads the registry.

use std::fmt;

use serde::Serialize;

use crate::domain::error::{InstallationError, LifecycleError};

/// Registry values describing a BizTalk Server installation.
///
/// Every field is optional because a partially configured host is a legitimate
/// state; accessors report which value is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Installation {
    pub installation_path: Option<String>,
    pub developer_tools_path: Option<String>,
    pub management_database_name: Option<String>,
    pub management_database_server: Option<String>,
    pub sql_scripts_path: Option<String>,
}

impl Installation {
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installation_path.is_some()
    }

    /// Installed and pointing at a management database.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.is_installed()
            && self.management_database_name.is_some()
            && self.management_database_server.is_some()
    }

    pub fn installation_path(&self) -> Result<&str, InstallationError> {
        self.require(self.installation_path.as_deref(), "InstallationPath")
    }

    pub fn developer_tools_path(&self) -> Result<&str, InstallationError> {
        self.require(self.developer_tools_path.as_deref(), "DeveloperToolsPath")
    }

    pub fn pipeline_tools_path(&self) -> Result<String, InstallationError> {
        let root = self.installation_path()?;
        Ok(join_windows(root, r"SDK\Utilities\PipelineTools\"))
    }

    pub fn management_database_name(&self) -> Result<&str, InstallationError> {
        self.require(self.management_database_name.as_deref(), "ManagementDatabaseName")
    }

    pub fn management_database_server(&self) -> Result<&str, InstallationError> {
        self.require(self.management_database_server.as_deref(), "ManagementDatabaseServer")
    }

    pub fn sql_scripts_path(&self) -> Result<&str, InstallationError> {
        self.require(self.sql_scripts_path.as_deref(), "SqlScriptsPath")
    }

    /// Folders the BizTalk runtime itself loads assemblies from, in probing order.
    ///
    /// Empty when BizTalk Server is not installed; folders whose registry value is
    /// missing are skipped.
    #[must_use]
    pub fn system_probing_paths(&self) -> Vec<String> {
        if !self.is_installed() {
            return Vec::new();
        }
        [
            self.installation_path().ok().map(str::to_string),
            self.developer_tools_path().ok().map(str::to_string),
            self.pipeline_tools_path().ok(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn require<'a>(&self, value: Option<&'a str>, name: &'static str) -> Result<&'a str, InstallationError> {
        match value {
            Some(v) => Ok(v),
            None if !self.is_installed() => Err(InstallationError::NotInstalled),
            None => Err(InstallationError::Incomplete { value: name }),
        }
    }
}

fn join_windows(root: &str, relative: &str) -> String {
    if root.ends_with('\\') {
        format!("{root}{relative}")
    } else {
        format!("{root}\\{relative}")
    }
}

/// The BizTalk management database a server group is defined by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagementDatabase {
    server: String,
    database: String,
}

impl ManagementDatabase {
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidArgument` if either name is empty.
    pub fn new(server: &str, database: &str) -> Result<Self, LifecycleError> {
        if server.trim().is_empty() {
            return Err(LifecycleError::InvalidArgument(
                "management database server must not be empty".to_string(),
            ));
        }
        if database.trim().is_empty() {
            return Err(LifecycleError::InvalidArgument(
                "management database name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            server: server.to_string(),
            database: database.to_string(),
        })
    }

    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// SQL Server connection string for ExplorerOM, tagged with the calling process name.
    #[must_use]
    pub fn connection_string(&self, process_name: &str) -> String {
        format!(
            "Data Source={};Initial Catalog={};Integrated Security=True;Application Name=ExplorerOM/{process_name}",
            self.server, self.database
        )
    }
}

impl fmt::Display for ManagementDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.server, self.database)
    }
}
