//! `ManagementBackend` over the CIM cmdlets.
//!
//! Acquiring an object runs `Get-CimInstance` with a key filter and keeps its
//! properties. Invoking a method fetches the instance again and calls
//! `Invoke-CimMethod`; a `CimException` or a non-zero `ReturnValue` is a
//! rejection. Void methods return no `ReturnValue`, which counts as success. The management provider holds no state between calls, so
//! releasing only drops the snapshot.

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::{debug, trace};

use crate::application::ports::{CommandRunner, ManagementBackend, ManagementSession};
use crate::domain::{LifecycleError, ManagementPath};
use crate::infra::powershell::{PowerShell, ScriptError, quote};

pub struct CimBackend<'r, R: CommandRunner> {
    shell: PowerShell<'r, R>,
    operation_timeout_secs: u32,
}

impl<'r, R: CommandRunner> CimBackend<'r, R> {
    #[must_use]
    pub fn new(runner: &'r R, powershell: &str, operation_timeout_secs: u32) -> Self {
        Self {
            shell: PowerShell::new(runner, powershell),
            operation_timeout_secs,
        }
    }

    /// Script fragment binding `$instance` to the object at `path`.
    fn instance_script(&self, path: &ManagementPath) -> String {
        let mut script = format!(
            "$instance = Get-CimInstance -Namespace {} -ClassName {} -Filter {} -OperationTimeoutSec {}",
            quote(path.namespace),
            quote(path.class),
            quote(&path.filter()),
            self.operation_timeout_secs
        );
        if path.computer != "." {
            let _ = write!(script, " -ComputerName {}", quote(&path.computer));
        }
        let _ = write!(
            script,
            "\nif ($null -eq $instance) {{ Fail 'unavailable' {} }}\n",
            quote(&format!("no management object at {path}"))
        );
        script
    }
}

impl<'r, R: CommandRunner> ManagementBackend for CimBackend<'r, R> {
    type Session<'a>
        = CimSession<'a, 'r, R>
    where
        Self: 'a;

    fn acquire(&self, path: &ManagementPath) -> Result<Self::Session<'_>, LifecycleError> {
        debug!(%path, "Get-CimInstance");
        let script = format!(
            "{}$properties = @{{}}\nforeach ($p in $instance.CimInstanceProperties) {{ $properties[$p.Name] = $p.Value }}\nComplete $properties\n",
            self.instance_script(path)
        );
        let properties: HashMap<String, serde_json::Value> = self
            .shell
            .run(&script)
            .map_err(|e| e.into_lifecycle(&path.to_string(), "Get", ""))?;
        Ok(CimSession {
            backend: self,
            path: path.clone(),
            properties: Some(properties),
        })
    }
}

pub struct CimSession<'a, 'r, R: CommandRunner> {
    backend: &'a CimBackend<'r, R>,
    path: ManagementPath,
    properties: Option<HashMap<String, serde_json::Value>>,
}

impl<R: CommandRunner> ManagementSession for CimSession<'_, '_, R> {
    fn property(&self, name: &str) -> Result<String, LifecycleError> {
        let properties = self.properties.as_ref().ok_or_else(|| {
            LifecycleError::BackendUnavailable(format!("{} has been released", self.path))
        })?;
        match properties.get(name) {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(serde_json::Value::Null) | None => Err(LifecycleError::BackendUnavailable(format!(
                "{} has no property {name}",
                self.path
            ))),
            Some(other) => Ok(other.to_string()),
        }
    }

    fn invoke(&mut self, method: &'static str, args: &[(&str, u32)]) -> Result<(), LifecycleError> {
        debug!(path = %self.path, method, ?args, "Invoke-CimMethod");
        let arguments = args
            .iter()
            .map(|(name, value)| format!("{} = [uint32]{value}", quote(name)))
            .collect::<Vec<_>>()
            .join("; ");
        let script = format!(
            "{}try {{\n    $r = Invoke-CimMethod -InputObject $instance -MethodName {} -Arguments @{{ {arguments} }} -OperationTimeoutSec {}\n}} catch [Microsoft.Management.Infrastructure.CimException] {{\n    Fail 'rejected' $_.Exception.Message\n}}\nif ($null -ne $r -and $null -ne $r.ReturnValue -and $r.ReturnValue -ne 0) {{ Fail 'rejected' ('{method} returned ' + $r.ReturnValue) }}\nComplete $null\n",
            self.backend.instance_script(&self.path),
            quote(method),
            self.backend.operation_timeout_secs
        );
        self.backend
            .shell
            .run::<serde_json::Value>(&script)
            .map(|_| ())
            .map_err(|e: ScriptError| e.into_lifecycle(&self.path.to_string(), method, ""))
    }

    fn release(&mut self) {
        if self.properties.take().is_some() {
            trace!(path = %self.path, "released");
        }
    }
}
