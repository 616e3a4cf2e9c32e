//! `InstallationSource` reading the BizTalk Server registry key through `reg.exe`.
//!
//! The key lives in the 32-bit registry view:
//! `HKLM\SOFTWARE\Microsoft\BizTalk Server\3.0` with `Administration` and
//! `XML TOOLS` subkeys.

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::application::ports::{CommandRunner, InstallationSource};
use crate::domain::Installation;

const BIZTALK_KEY: &str = r"HKLM\SOFTWARE\Microsoft\BizTalk Server\3.0";
const BIZTALK_KEY_EXPANDED: &str = r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\BizTalk Server\3.0";

#[allow(clippy::expect_used)] // compile-time constant pattern
static VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?P<name>.+?)\s{4}(?P<kind>REG_[A-Z_]+)(?:\s{4}(?P<data>.*))?$")
        .expect("valid value-line pattern")
});

pub struct RegistryInstallationSource<'r, R: CommandRunner> {
    runner: &'r R,
}

impl<'r, R: CommandRunner> RegistryInstallationSource<'r, R> {
    #[must_use]
    pub fn new(runner: &'r R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> InstallationSource for RegistryInstallationSource<'_, R> {
    fn discover(&self) -> Result<Installation> {
        let output = self
            .runner
            .run("reg.exe", &["query", BIZTALK_KEY, "/s", "/reg:32"])?;
        if !output.status.success() {
            // reg.exe exits with 1 when the key does not exist.
            debug!(status = ?output.status, "BizTalk Server registry key not found");
            return Ok(Installation::default());
        }
        let values = parse_reg_query(&String::from_utf8_lossy(&output.stdout));
        Ok(installation_from(&values))
    }
}

/// Values keyed by `(subkey relative to the BizTalk key, value name)`.
type RegistryValues = HashMap<(String, String), String>;

fn parse_reg_query(stdout: &str) -> RegistryValues {
    let mut values = HashMap::new();
    let mut subkey: Option<String> = None;
    for line in stdout.lines() {
        let trimmed = line.trim_end();
        if trimmed.starts_with("HKEY_") {
            subkey = trimmed
                .strip_prefix(BIZTALK_KEY_EXPANDED)
                .map(|rest| rest.trim_start_matches('\\').to_string());
            continue;
        }
        let (Some(key), Some(caps)) = (&subkey, VALUE_LINE.captures(trimmed)) else {
            continue;
        };
        let data = caps.name("data").map_or("", |m| m.as_str());
        values.insert((key.clone(), caps["name"].to_string()), data.to_string());
    }
    values
}

fn installation_from(values: &RegistryValues) -> Installation {
    let get = |subkey: &str, name: &str| {
        values
            .get(&(subkey.to_string(), name.to_string()))
            .filter(|v| !v.is_empty())
            .cloned()
    };
    let Some(installation_path) = get("", "InstallPath") else {
        return Installation::default();
    };
    Installation {
        installation_path: Some(installation_path),
        developer_tools_path: get("XML TOOLS", "DataFilesPath"),
        management_database_name: get("Administration", "MgmtDBName"),
        management_database_server: get("Administration", "MgmtDBServer"),
        sql_scripts_path: get("Administration", "SQLScriptPath"),
    }
}
