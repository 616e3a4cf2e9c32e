//! Receive location controller: a binary enabled flag, no staged lifecycle.

use tracing::debug;

use crate::application::ports::CatalogExplorer;
use crate::domain::{LifecycleError, ReceiveLocationEntry};

pub struct ReceiveLocationController<'e, E: CatalogExplorer> {
    explorer: &'e E,
    application: String,
    receive_port: String,
    snapshot: ReceiveLocationEntry,
}

impl<'e, E: CatalogExplorer> ReceiveLocationController<'e, E> {
    /// Bind a controller to `receive_location` of `receive_port` in `application`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application, port or location does not exist.
    pub fn new(
        explorer: &'e E,
        application: &str,
        receive_port: &str,
        receive_location: &str,
    ) -> Result<Self, LifecycleError> {
        let snapshot = load(explorer, application, receive_port, receive_location)?;
        Ok(Self {
            explorer,
            application: application.to_string(),
            receive_port: receive_port.to_string(),
            snapshot,
        })
    }

    pub(crate) fn from_snapshot(
        explorer: &'e E,
        application: &str,
        receive_port: &str,
        snapshot: ReceiveLocationEntry,
    ) -> Self {
        Self {
            explorer,
            application: application.to_string(),
            receive_port: receive_port.to_string(),
            snapshot,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the location vanished and `BackendUnavailable` if the
    /// catalog cannot be read.
    pub fn is_enabled(&mut self) -> Result<bool, LifecycleError> {
        self.snapshot = load(
            self.explorer,
            &self.application,
            &self.receive_port,
            &self.snapshot.name,
        )?;
        Ok(self.snapshot.enabled)
    }

    /// # Errors
    ///
    /// Propagates catalog failures; a refused save is `InvalidTransition`.
    pub fn enable(&mut self) -> Result<(), LifecycleError> {
        self.set_enabled(true)
    }

    /// # Errors
    ///
    /// Propagates catalog failures; a refused save is `InvalidTransition`.
    pub fn disable(&mut self) -> Result<(), LifecycleError> {
        self.set_enabled(false)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), LifecycleError> {
        if self.is_enabled()? == enabled {
            return Ok(());
        }
        debug!(receive_location = %self.snapshot.name, enabled, "assigning enabled flag");
        self.explorer.apply_receive_location_enabled(
            &self.application,
            &self.receive_port,
            &self.snapshot.name,
            enabled,
        )?;
        self.is_enabled().map(|_| ())
    }
}

fn load<E: CatalogExplorer>(
    explorer: &E,
    application: &str,
    receive_port: &str,
    name: &str,
) -> Result<ReceiveLocationEntry, LifecycleError> {
    let group = explorer.management_database().to_string();
    let record = explorer.application(application)?;
    record
        .receive_port(receive_port, &group)?
        .receive_location(name, &group)
        .cloned()
}
