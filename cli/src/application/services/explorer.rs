//! Application service: browsing a BizTalk group's applications.
//!
//! `Application` is a read-only view over one catalog snapshot. Its collections
//! only look things up; lifecycle changes go through the controllers they hand out.

use btsctl_common::PortStatus;
use tracing::debug;

use crate::application::ports::CatalogExplorer;
use crate::application::services::lifecycle::{ReceiveLocationController, SendPortController};
use crate::domain::{
    ApplicationRecord, LifecycleError, OrchestrationEntry, ReceivePortEntry, SendPortEntry,
};

/// Name-keyed, read-only collection of catalog entries.
pub struct Collection<'a, T> {
    items: &'a [T],
    kind: &'static str,
    group: String,
    key: fn(&T) -> &str,
}

impl<'a, T> Collection<'a, T> {
    /// # Errors
    ///
    /// Returns `NotFound` naming the entry kind and the group.
    pub fn get(&self, name: &str) -> Result<&'a T, LifecycleError> {
        self.items
            .iter()
            .find(|item| (self.key)(item) == name)
            .ok_or_else(|| LifecycleError::NotFound {
                kind: self.kind,
                name: name.to_string(),
                group: self.group.clone(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| (self.key)(item) == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.items.iter().map(self.key).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single property assignment saved to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    SendPortStatus {
        send_port: String,
        status: PortStatus,
    },
    ReceiveLocationEnabled {
        receive_port: String,
        receive_location: String,
        enabled: bool,
    },
}

/// One application of the group, loaded from the catalog.
pub struct Application<'e, E: CatalogExplorer> {
    explorer: &'e E,
    record: ApplicationRecord,
}

impl<'e, E: CatalogExplorer> Application<'e, E> {
    /// # Errors
    ///
    /// Returns `NotFound` if the group has no application named `name`.
    pub fn load(explorer: &'e E, name: &str) -> Result<Self, LifecycleError> {
        debug!(application = name, group = %explorer.management_database(), "loading application");
        let record = explorer.application(name)?;
        Ok(Self { explorer, record })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Reload the snapshot from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application was removed meanwhile.
    pub fn refresh(&mut self) -> Result<(), LifecycleError> {
        self.record = self.explorer.application(&self.record.name)?;
        Ok(())
    }

    /// Save every change in order, then reload the snapshot.
    ///
    /// Stops at the first refused change; the changes saved before it stay saved
    /// and the snapshot is not reloaded.
    ///
    /// # Errors
    ///
    /// Returns the catalog error of the first change that cannot be saved.
    pub fn apply_changes(&mut self, changes: &[CatalogChange]) -> Result<(), LifecycleError> {
        for change in changes {
            debug!(application = %self.record.name, ?change, "saving change");
            match change {
                CatalogChange::SendPortStatus { send_port, status } => {
                    self.explorer
                        .apply_send_port_status(&self.record.name, send_port, *status)?;
                }
                CatalogChange::ReceiveLocationEnabled {
                    receive_port,
                    receive_location,
                    enabled,
                } => self.explorer.apply_receive_location_enabled(
                    &self.record.name,
                    receive_port,
                    receive_location,
                    *enabled,
                )?,
            }
        }
        self.refresh()
    }

    #[must_use]
    pub fn orchestrations(&self) -> Collection<'_, OrchestrationEntry> {
        self.collection(&self.record.orchestrations, "BizTalk Orchestration", |o| o.full_name.as_str())
    }

    #[must_use]
    pub fn send_ports(&self) -> Collection<'_, SendPortEntry> {
        self.collection(&self.record.send_ports, "BizTalk Send Port", |p| p.name.as_str())
    }

    #[must_use]
    pub fn receive_ports(&self) -> Collection<'_, ReceivePortEntry> {
        self.collection(&self.record.receive_ports, "BizTalk Receive Port", |p| p.name.as_str())
    }

    /// Lifecycle controller for one of this application's send ports.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application has no such send port.
    pub fn send_port(&self, name: &str) -> Result<SendPortController<'e, E>, LifecycleError> {
        let entry = self.send_ports().get(name)?.clone();
        Ok(SendPortController::from_snapshot(self.explorer, &self.record.name, entry))
    }

    /// Controller for a receive location of one of this application's receive ports.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the port or the location does not exist.
    pub fn receive_location(
        &self,
        receive_port: &str,
        name: &str,
    ) -> Result<ReceiveLocationController<'e, E>, LifecycleError> {
        let group = self.group();
        let entry = self
            .receive_ports()
            .get(receive_port)?
            .receive_location(name, &group)?
            .clone();
        Ok(ReceiveLocationController::from_snapshot(
            self.explorer,
            &self.record.name,
            receive_port,
            entry,
        ))
    }

    fn group(&self) -> String {
        self.explorer.management_database().to_string()
    }

    fn collection<'a, T>(&self, items: &'a [T], kind: &'static str, key: fn(&T) -> &str) -> Collection<'a, T> {
        Collection {
            items,
            kind,
            group: self.group(),
            key,
        }
    }
}
