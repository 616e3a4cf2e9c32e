//! Send port controller driven by catalog status assignment.

use btsctl_common::{LifecycleStage, PortStatus};
use tracing::{debug, trace};

use crate::application::ports::CatalogExplorer;
use crate::application::services::lifecycle::ManagedResource;
use crate::domain::{LifecycleError, SendPortEntry};

/// Lifecycle handle on one send port of an application.
///
/// Primitives guard on the snapshot taken by the last read or refresh, assign
/// the new status, save it, then reload the application.
pub struct SendPortController<'e, E: CatalogExplorer> {
    explorer: &'e E,
    application: String,
    snapshot: SendPortEntry,
}

impl<'e, E: CatalogExplorer> SendPortController<'e, E> {
    /// Bind a controller to `send_port` of `application`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application or the port does not exist.
    pub fn new(explorer: &'e E, application: &str, send_port: &str) -> Result<Self, LifecycleError> {
        let snapshot = load(explorer, application, send_port)?;
        Ok(Self {
            explorer,
            application: application.to_string(),
            snapshot,
        })
    }

    pub(crate) fn from_snapshot(explorer: &'e E, application: &str, snapshot: SendPortEntry) -> Self {
        Self {
            explorer,
            application: application.to_string(),
            snapshot,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    /// Current status, read by reloading the application from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the port vanished and `BackendUnavailable` if the
    /// catalog cannot be read.
    pub fn status(&mut self) -> Result<PortStatus, LifecycleError> {
        self.refresh()?;
        Ok(self.snapshot.status)
    }

    fn assign(&mut self, status: PortStatus) -> Result<(), LifecycleError> {
        debug!(send_port = %self.snapshot.name, from = %self.snapshot.status, to = %status, "assigning status");
        self.explorer
            .apply_send_port_status(&self.application, &self.snapshot.name, status)?;
        self.refresh()
    }

    fn refresh(&mut self) -> Result<(), LifecycleError> {
        trace!(send_port = %self.snapshot.name, "reloading application");
        self.snapshot = load(self.explorer, &self.application, &self.snapshot.name)?;
        Ok(())
    }
}

fn load<E: CatalogExplorer>(explorer: &E, application: &str, name: &str) -> Result<SendPortEntry, LifecycleError> {
    let group = explorer.management_database().to_string();
    let record = explorer.application(application)?;
    record.send_port(name, &group).cloned()
}

impl<E: CatalogExplorer> ManagedResource for SendPortController<'_, E> {
    fn describe(&self) -> String {
        format!("send port '{}'", self.snapshot.name)
    }

    fn stage(&mut self) -> Result<LifecycleStage, LifecycleError> {
        self.status().map(LifecycleStage::from)
    }

    /// Bound becomes Stopped; any other status is left as is.
    fn enlist(&mut self) -> Result<(), LifecycleError> {
        if self.snapshot.status == PortStatus::Bound {
            self.assign(PortStatus::Stopped)?;
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), LifecycleError> {
        if self.snapshot.status != PortStatus::Started {
            self.assign(PortStatus::Started)?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), LifecycleError> {
        if self.snapshot.status != PortStatus::Stopped {
            self.assign(PortStatus::Stopped)?;
        }
        Ok(())
    }

    /// Stopped becomes Bound. A started port must be stopped first.
    fn unenlist(&mut self) -> Result<(), LifecycleError> {
        match self.snapshot.status {
            PortStatus::Bound => Ok(()),
            PortStatus::Stopped => self.assign(PortStatus::Bound),
            PortStatus::Started => Err(LifecycleError::InvalidTransition {
                resource: self.describe(),
                verb: "Unenlist",
                reason: "the port is started and must be stopped first".to_string(),
            }),
        }
    }
}
