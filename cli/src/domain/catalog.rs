//! Read-only snapshots of BizTalk applications as exposed by the catalog.
//!
//! Collections are name-keyed lookups that fail with `LifecycleError::NotFound`;
//! they hold no lifecycle logic.

use btsctl_common::PortStatus;
use serde::{Deserialize, Serialize};

use crate::domain::error::LifecycleError;
use crate::domain::identity::{AssemblyName, BTX_SERVICE_TYPE, TypeDescriptor};

/// One application, with everything it deploys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub name: String,
    #[serde(default)]
    pub orchestrations: Vec<OrchestrationEntry>,
    #[serde(default)]
    pub send_ports: Vec<SendPortEntry>,
    #[serde(default)]
    pub receive_ports: Vec<ReceivePortEntry>,
}

/// An orchestration deployed in an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationEntry {
    pub full_name: String,
    pub assembly: AssemblyName,
}

impl OrchestrationEntry {
    /// Type descriptor of this entry; the catalog only registers `BTXService`-derived types.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor {
            full_name: self.full_name.clone(),
            assembly: self.assembly.clone(),
            base_types: vec![BTX_SERVICE_TYPE.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPortEntry {
    pub name: String,
    #[serde(with = "port_status_repr")]
    pub status: PortStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePortEntry {
    pub name: String,
    #[serde(default)]
    pub receive_locations: Vec<ReceiveLocationEntry>,
}

impl ReceivePortEntry {
    /// Look up a receive location of this port by name.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::NotFound` if the port has no such location.
    pub fn receive_location(&self, name: &str, group: &str) -> Result<&ReceiveLocationEntry, LifecycleError> {
        lookup(&self.receive_locations, name, |l| &l.name, "BizTalk Receive Location", group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveLocationEntry {
    pub name: String,
    pub enabled: bool,
}

impl ApplicationRecord {
    /// # Errors
    ///
    /// Returns `LifecycleError::NotFound` if the application deploys no such orchestration.
    pub fn orchestration(&self, name: &str, group: &str) -> Result<&OrchestrationEntry, LifecycleError> {
        lookup(&self.orchestrations, name, |o| &o.full_name, "BizTalk Orchestration", group)
    }

    /// # Errors
    ///
    /// Returns `LifecycleError::NotFound` if the application has no such send port.
    pub fn send_port(&self, name: &str, group: &str) -> Result<&SendPortEntry, LifecycleError> {
        lookup(&self.send_ports, name, |p| &p.name, "BizTalk Send Port", group)
    }

    /// # Errors
    ///
    /// Returns `LifecycleError::NotFound` if the application has no such receive port.
    pub fn receive_port(&self, name: &str, group: &str) -> Result<&ReceivePortEntry, LifecycleError> {
        lookup(&self.receive_ports, name, |p| &p.name, "BizTalk Receive Port", group)
    }
}

fn lookup<'a, T>(
    items: &'a [T],
    name: &str,
    key: impl Fn(&T) -> &String,
    kind: &'static str,
    group: &str,
) -> Result<&'a T, LifecycleError> {
    items
        .iter()
        .find(|item| key(item) == name)
        .ok_or_else(|| LifecycleError::NotFound {
            kind,
            name: name.to_string(),
            group: group.to_string(),
        })
}

/// The catalog serializes `PortStatus` as its numeric value; names are accepted too.
mod port_status_repr {
    use btsctl_common::PortStatus;
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u8),
        Name(String),
    }

    pub fn serialize<S: Serializer>(status: &PortStatus, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(status.catalog_value())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PortStatus, D::Error> {
        let raw = match Repr::deserialize(deserializer)? {
            Repr::Number(n) => n.to_string(),
            Repr::Name(s) => s,
        };
        raw.parse().map_err(de::Error::custom)
    }
}
