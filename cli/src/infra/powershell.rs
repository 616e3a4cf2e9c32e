//! PowerShell script host shared by the BizTalk adapters.
//!
//! Each call writes a script to a temporary `.ps1` file and runs it with
//! `-File`. Scripts end with `Complete <result>` or `Fail <kind> <message>`,
//! both of which print a single JSON envelope on stdout. Lines starting with
//! `LOG_PREFIX` before the envelope are forwarded to the debug log.

use std::io::Write as _;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::application::ports::CommandRunner;
use crate::domain::LifecycleError;

/// Marks a script stdout line as a log message.
pub const LOG_PREFIX: &str = "##btsctl ";

const PRELUDE: &str = r"$ErrorActionPreference = 'Stop'
$ProgressPreference = 'SilentlyContinue'
function Complete($result) {
    [pscustomobject]@{ status = 'ok'; result = $result } | ConvertTo-Json -Depth 8 -Compress
    exit 0
}
function Fail([string]$kind, [string]$message, [string]$resource = $null, [string]$name = $null) {
    [pscustomobject]@{ status = 'failed'; kind = $kind; message = $message; resource = $resource; name = $name } | ConvertTo-Json -Compress
    exit 0
}
try {
";

const EPILOGUE: &str = r"
} catch {
    Fail 'unavailable' $_.Exception.Message
}
";

/// Failure reported by a script, or by the host when the script could not run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Rejected(String),
    #[error("{resource} '{name}' not found")]
    NotFound { resource: String, name: String },
    #[error("{0}")]
    InvalidArgument(String),
}

impl ScriptError {
    /// Map onto the lifecycle error kinds.
    ///
    /// `resource` and `verb` name the rejected operation; `group` qualifies
    /// lookups that failed.
    pub fn into_lifecycle(self, resource: &str, verb: &'static str, group: &str) -> LifecycleError {
        match self {
            Self::Unavailable(reason) => LifecycleError::BackendUnavailable(reason),
            Self::Rejected(reason) => LifecycleError::InvalidTransition {
                resource: resource.to_string(),
                verb,
                reason,
            },
            Self::InvalidArgument(reason) => LifecycleError::InvalidArgument(reason),
            Self::NotFound { resource, name } => match catalog_kind(&resource) {
                Some(kind) => LifecycleError::NotFound {
                    kind,
                    name,
                    group: group.to_string(),
                },
                None => LifecycleError::BackendUnavailable(format!("{resource} '{name}' not found")),
            },
        }
    }
}

fn catalog_kind(resource: &str) -> Option<&'static str> {
    [
        "BizTalk Server Application",
        "BizTalk Orchestration",
        "BizTalk Send Port",
        "BizTalk Receive Port",
        "BizTalk Receive Location",
    ]
    .into_iter()
    .find(|kind| *kind == resource)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Envelope {
    Ok {
        #[serde(default)]
        result: serde_json::Value,
    },
    Failed {
        kind: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        resource: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Runs scripts through a `CommandRunner`.
pub struct PowerShell<'r, R: CommandRunner> {
    runner: &'r R,
    executable: String,
}

impl<'r, R: CommandRunner> PowerShell<'r, R> {
    #[must_use]
    pub fn new(runner: &'r R, executable: &str) -> Self {
        Self {
            runner,
            executable: executable.to_string(),
        }
    }

    /// Run `body` and deserialize the value it completes with.
    ///
    /// # Errors
    ///
    /// Returns the failure the script reported, or `Unavailable` when the host
    /// cannot start PowerShell or make sense of its output.
    pub fn run<T: DeserializeOwned>(&self, body: &str) -> Result<T, ScriptError> {
        let value = self.run_value(body)?;
        serde_json::from_value(value)
            .map_err(|e| ScriptError::Unavailable(format!("unexpected script result: {e}")))
    }

    fn run_value(&self, body: &str) -> Result<serde_json::Value, ScriptError> {
        let script = format!("{PRELUDE}{body}{EPILOGUE}");
        trace!(%script, "powershell script");

        let mut file = tempfile::Builder::new()
            .prefix("btsctl-")
            .suffix(".ps1")
            .tempfile()
            .map_err(|e| ScriptError::Unavailable(format!("cannot create script file: {e}")))?;
        file.write_all(script.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| ScriptError::Unavailable(format!("cannot write script file: {e}")))?;
        let path = file.path().to_string_lossy().into_owned();

        let output = self
            .runner
            .run(
                &self.executable,
                &[
                    "-NoLogo",
                    "-NoProfile",
                    "-NonInteractive",
                    "-ExecutionPolicy",
                    "Bypass",
                    "-File",
                    &path,
                ],
            )
            .map_err(|e| ScriptError::Unavailable(format!("{e:#}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(status = ?output.status, %stderr, "powershell failed");
            return Err(ScriptError::Unavailable(format!(
                "{} exited with {}: {}",
                self.executable,
                output.status,
                stderr.trim()
            )));
        }

        for message in stdout.lines().filter_map(|l| l.strip_prefix(LOG_PREFIX)) {
            debug!(target: "btsctl::powershell", "{message}");
        }

        // Only the last line is the envelope; anything before it is stray host output.
        let line = stdout.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or_default();
        match serde_json::from_str::<Envelope>(line) {
            Ok(Envelope::Ok { result }) => Ok(result),
            Ok(Envelope::Failed {
                kind,
                message,
                resource,
                name,
            }) => Err(failure(&kind, message.unwrap_or_default(), resource, name)),
            Err(e) => Err(ScriptError::Unavailable(format!(
                "unparsable output from {}: {e}",
                self.executable
            ))),
        }
    }
}

fn failure(kind: &str, message: String, resource: Option<String>, name: Option<String>) -> ScriptError {
    match kind {
        "rejected" => ScriptError::Rejected(message),
        "invalidArgument" => ScriptError::InvalidArgument(message),
        "notFound" => ScriptError::NotFound {
            resource: resource.unwrap_or_default(),
            name: name.unwrap_or_default(),
        },
        _ => ScriptError::Unavailable(message),
    }
}

/// Quote `value` as a PowerShell single-quoted string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote every value and join them into a PowerShell array literal.
#[must_use]
pub fn quote_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("@({})", items.join(", "))
}
