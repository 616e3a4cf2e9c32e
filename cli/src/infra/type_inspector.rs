//! `TypeInspector` using .NET reflection inside PowerShell.

use std::path::Path;

use tracing::debug;

use crate::application::ports::{CommandRunner, TypeInspector};
use crate::domain::identity::{RESOURCES_SUFFIX, XML_SERIALIZERS_SUFFIX};
use crate::domain::{LifecycleError, ProbingPolicy, TypeDescriptor};
use crate::infra::powershell::{LOG_PREFIX, PowerShell, quote, quote_array};

pub struct ReflectionInspector<'r, R: CommandRunner> {
    shell: PowerShell<'r, R>,
}

impl<'r, R: CommandRunner> ReflectionInspector<'r, R> {
    #[must_use]
    pub fn new(runner: &'r R, powershell: &str) -> Self {
        Self {
            shell: PowerShell::new(runner, powershell),
        }
    }
}

impl<R: CommandRunner> TypeInspector for ReflectionInspector<'_, R> {
    fn describe(
        &self,
        assembly_path: &Path,
        type_name: &str,
        probing: &ProbingPolicy,
    ) -> Result<TypeDescriptor, LifecycleError> {
        debug!(assembly = %assembly_path.display(), type_name, "reflecting");
        let script = format!(
            "{handler}[System.AppDomain]::CurrentDomain.add_AssemblyResolve($resolve)
$assembly = [System.Reflection.Assembly]::LoadFrom({path})
$type = $assembly.GetType({type_name}, $false)
if ($null -eq $type) {{ Fail 'invalidArgument' {missing} }}
$bases = @()
$base = $type.BaseType
while ($null -ne $base) {{ $bases += $base.FullName; $base = $base.BaseType }}
Complete ([pscustomobject]@{{ fullName = $type.FullName; assembly = $type.Assembly.FullName; baseTypes = $bases }})
",
            handler = resolve_handler(probing),
            path = quote(&assembly_path.to_string_lossy()),
            type_name = quote(type_name),
            missing = quote(&format!(
                "Type '{type_name}' cannot be found in assembly '{}'.",
                assembly_path.display()
            )),
        );
        self.shell
            .run(&script)
            .map_err(|e| e.into_lifecycle(&format!("type '{type_name}'"), "Describe", ""))
    }
}

/// `AssemblyResolve` handler bound to `$resolve`, applying the same rules as
/// `AssemblyResolver` to every dependency the runtime asks for.
fn resolve_handler(probing: &ProbingPolicy) -> String {
    let log = |expr: &str| format!("[Console]::Out.WriteLine({} + {expr})", quote(LOG_PREFIX));
    format!(
        "$probing = {paths}
$skipResources = ${skip_resources}
$pending = New-Object 'System.Collections.Generic.HashSet[string]'
$resolve = {{
    param($sender, $e)
    $simple = (New-Object System.Reflection.AssemblyName $e.Name).Name
    if ($skipResources -and $simple.EndsWith({resources})) {{ return $null }}
    if ($simple.EndsWith({serializers})) {{ return $null }}
    if (-not $pending.Add($simple)) {{
        {in_progress}
        return $null
    }}
    try {{
        foreach ($folder in $probing) {{
            $candidate = Join-Path $folder ($simple + '.dll')
            {probing_line}
            if (Test-Path -LiteralPath $candidate) {{ return [System.Reflection.Assembly]::LoadFrom($candidate) }}
        }}
        {missing}
        return $null
    }} finally {{
        [void]$pending.Remove($simple)
    }}
}}.GetNewClosure()
",
        paths = quote_array(&probing.paths),
        skip_resources = probing.skip_resources,
        resources = quote(RESOURCES_SUFFIX),
        serializers = quote(XML_SERIALIZERS_SUFFIX),
        in_progress = log("('resolution of ' + $simple + ' already in progress')"),
        probing_line = log("('probing ' + $candidate)"),
        missing = log("($e.Name + ' not found in any probing folder')"),
    )
}
