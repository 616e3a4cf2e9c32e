use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a managed resource on the activation lifecycle.
///
/// Every resource kind with a full lifecycle projects its native status onto this order,
/// which is what the ensure-operations reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    /// No activation subscription exists.
    Unenlisted,
    /// Subscribed but not processing.
    Enlisted,
    /// Subscribed and processing.
    Started,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unenlisted => "unenlisted",
            Self::Enlisted => "enlisted",
            Self::Started => "started",
        })
    }
}

/// Failure to map a backend status representation onto a known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} status '{value}'")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

/// Orchestration status as reported by `MSBTS_Orchestration.OrchestrationStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationStatus {
    Unenlisted,
    Enlisted,
    Started,
}

impl OrchestrationStatus {
    /// Map a WMI status code (`"2"`, `"3"` or `"4"`) onto a status.
    ///
    /// Any other code, including the documented-but-unused `"1"` (unbound), is rejected.
    pub fn from_wmi_code(code: &str) -> Result<Self, ParseStatusError> {
        match code.trim() {
            "2" => Ok(Self::Unenlisted),
            "3" => Ok(Self::Enlisted),
            "4" => Ok(Self::Started),
            other => Err(ParseStatusError {
                kind: "orchestration",
                value: other.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn wmi_code(self) -> &'static str {
        match self {
            Self::Unenlisted => "2",
            Self::Enlisted => "3",
            Self::Started => "4",
        }
    }
}

impl From<OrchestrationStatus> for LifecycleStage {
    fn from(status: OrchestrationStatus) -> Self {
        match status {
            OrchestrationStatus::Unenlisted => Self::Unenlisted,
            OrchestrationStatus::Enlisted => Self::Enlisted,
            OrchestrationStatus::Started => Self::Started,
        }
    }
}

impl fmt::Display for OrchestrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        LifecycleStage::from(*self).fmt(f)
    }
}

/// Send port status as exposed by the ExplorerOM catalog (`Microsoft.BizTalk.ExplorerOM.PortStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PortStatus {
    Bound,
    Stopped,
    Started,
}

impl PortStatus {
    /// Numeric value of the catalog enumeration.
    #[must_use]
    pub const fn catalog_value(self) -> u8 {
        match self {
            Self::Bound => 1,
            Self::Stopped => 2,
            Self::Started => 3,
        }
    }
}

impl FromStr for PortStatus {
    type Err = ParseStatusError;

    /// Accepts either the enumeration name or its numeric value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Bound" | "1" => Ok(Self::Bound),
            "Stopped" | "2" => Ok(Self::Stopped),
            "Started" | "3" => Ok(Self::Started),
            other => Err(ParseStatusError {
                kind: "port",
                value: other.to_string(),
            }),
        }
    }
}

impl From<PortStatus> for LifecycleStage {
    fn from(status: PortStatus) -> Self {
        match status {
            PortStatus::Bound => Self::Unenlisted,
            PortStatus::Stopped => Self::Enlisted,
            PortStatus::Started => Self::Started,
        }
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bound => "Bound",
            Self::Stopped => "Stopped",
            Self::Started => "Started",
        })
    }
}
