//! `CatalogExplorer` over `Microsoft.BizTalk.ExplorerOM`, hosted in PowerShell.
//!
//! Every call opens a `BtsCatalogExplorer` on the management database, so each
//! read is a fresh snapshot. Writes assign one property and `SaveChanges()`;
//! a failed save is discarded and reported as a rejection.

use btsctl_common::PortStatus;
use tracing::debug;

use crate::application::ports::{CatalogExplorer, CommandRunner};
use crate::domain::{ApplicationRecord, LifecycleError, ManagementDatabase};
use crate::infra::powershell::{PowerShell, quote};

const EXPLORER_OM: &str =
    "Microsoft.BizTalk.ExplorerOM, Version=3.0.1.0, Culture=neutral, PublicKeyToken=31bf3856ad364e35";

const APPLICATION_KIND: &str = "BizTalk Server Application";

pub struct ExplorerOmCatalog<'r, R: CommandRunner> {
    shell: PowerShell<'r, R>,
    database: ManagementDatabase,
}

impl<'r, R: CommandRunner> ExplorerOmCatalog<'r, R> {
    #[must_use]
    pub fn new(runner: &'r R, powershell: &str, database: ManagementDatabase) -> Self {
        Self {
            shell: PowerShell::new(runner, powershell),
            database,
        }
    }

    /// Script fragment binding `$catalog` and `$app`.
    fn application_script(&self, application: &str) -> String {
        format!(
            "Add-Type -AssemblyName {assembly}
$catalog = New-Object Microsoft.BizTalk.ExplorerOM.BtsCatalogExplorer
$catalog.ConnectionString = {connection}
$app = $catalog.Applications[{name}]
if ($null -eq $app) {{ Fail 'notFound' '' {kind} {name} }}
",
            assembly = quote(EXPLORER_OM),
            connection = quote(&self.database.connection_string(env!("CARGO_PKG_NAME"))),
            name = quote(application),
            kind = quote(APPLICATION_KIND),
        )
    }

    /// Script fragment that saves pending changes, discarding them on failure.
    fn save_script() -> &'static str {
        "try {
    $catalog.SaveChanges()
} catch {
    $catalog.DiscardChanges()
    Fail 'rejected' $_.Exception.Message
}
Complete $null
"
    }

    fn write(&self, script: &str, resource: &str, verb: &'static str) -> Result<(), LifecycleError> {
        self.shell
            .run::<serde_json::Value>(script)
            .map(|_| ())
            .map_err(|e| e.into_lifecycle(resource, verb, &self.database.to_string()))
    }
}

impl<R: CommandRunner> CatalogExplorer for ExplorerOmCatalog<'_, R> {
    fn management_database(&self) -> &ManagementDatabase {
        &self.database
    }

    fn application(&self, name: &str) -> Result<ApplicationRecord, LifecycleError> {
        debug!(application = name, group = %self.database, "loading application");
        let script = format!(
            "{}Complete ([pscustomobject]@{{
    name = $app.Name
    orchestrations = @($app.Orchestrations | ForEach-Object {{ [pscustomobject]@{{ fullName = $_.FullName; assembly = $_.BtsAssembly.DisplayName }} }})
    sendPorts = @($app.SendPorts | ForEach-Object {{ [pscustomobject]@{{ name = $_.Name; status = [int]$_.Status }} }})
    receivePorts = @($app.ReceivePorts | ForEach-Object {{
        [pscustomobject]@{{
            name = $_.Name
            receiveLocations = @($_.ReceiveLocations | ForEach-Object {{ [pscustomobject]@{{ name = $_.Name; enabled = [bool]$_.Enable }} }})
        }}
    }})
}})
",
            self.application_script(name)
        );
        self.shell
            .run(&script)
            .map_err(|e| e.into_lifecycle(&format!("application '{name}'"), "Load", &self.database.to_string()))
    }

    fn apply_send_port_status(
        &self,
        application: &str,
        send_port: &str,
        status: PortStatus,
    ) -> Result<(), LifecycleError> {
        debug!(application, send_port, %status, "saving send port status");
        let script = format!(
            "{}$port = $app.SendPorts[{name}]
if ($null -eq $port) {{ Fail 'notFound' '' 'BizTalk Send Port' {name} }}
$port.Status = [Microsoft.BizTalk.ExplorerOM.PortStatus]::{status}
{save}",
            self.application_script(application),
            name = quote(send_port),
            save = Self::save_script(),
        );
        self.write(&script, &format!("send port '{send_port}'"), verb_for(status))
    }

    fn apply_receive_location_enabled(
        &self,
        application: &str,
        receive_port: &str,
        receive_location: &str,
        enabled: bool,
    ) -> Result<(), LifecycleError> {
        debug!(application, receive_port, receive_location, enabled, "saving receive location");
        let script = format!(
            "{}$port = $app.ReceivePorts[{port}]
if ($null -eq $port) {{ Fail 'notFound' '' 'BizTalk Receive Port' {port} }}
$location = $port.ReceiveLocations[{location}]
if ($null -eq $location) {{ Fail 'notFound' '' 'BizTalk Receive Location' {location} }}
$location.Enable = ${enabled}
{save}",
            self.application_script(application),
            port = quote(receive_port),
            location = quote(receive_location),
            save = Self::save_script(),
        );
        let verb = if enabled { "Enable" } else { "Disable" };
        self.write(&script, &format!("receive location '{receive_location}'"), verb)
    }
}

const fn verb_for(status: PortStatus) -> &'static str {
    match status {
        PortStatus::Bound => "Unenlist",
        PortStatus::Stopped => "Stop",
        PortStatus::Started => "Start",
    }
}
