//! Argument flags of the `MSBTS_Orchestration` management methods.
//!
//! Every flag is an integer on the wire: 1 means "no automatic action", 2 means "act
//! automatically". The WMI-documented defaults are kept as associated constants.

use serde::{Deserialize, Serialize};

/// A single management method flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum AutoFlag {
    /// Leave related artifacts and instances alone (1).
    NoAutoAction,
    /// Act on related artifacts and instances (2).
    Automatic,
}

impl AutoFlag {
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::NoAutoAction => 1,
            Self::Automatic => 2,
        }
    }
}

/// Arguments of `MSBTS_Orchestration.Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartFlags {
    pub auto_enable_receive_locations: AutoFlag,
    pub auto_resume_instances: AutoFlag,
    pub auto_start_send_ports: AutoFlag,
}

impl StartFlags {
    /// Defaults documented for the WMI method: (1, 2, 2).
    pub const WMI_DEFAULT: Self = Self {
        auto_enable_receive_locations: AutoFlag::NoAutoAction,
        auto_resume_instances: AutoFlag::Automatic,
        auto_start_send_ports: AutoFlag::Automatic,
    };

    /// Enable, resume and start everything the orchestration depends on.
    pub const AUTOMATIC: Self = Self {
        auto_enable_receive_locations: AutoFlag::Automatic,
        auto_resume_instances: AutoFlag::Automatic,
        auto_start_send_ports: AutoFlag::Automatic,
    };

    /// Named method arguments in invocation order.
    #[must_use]
    pub const fn arguments(&self) -> [(&'static str, u32); 3] {
        [
            (
                "AutoEnableReceiveLocationFlag",
                self.auto_enable_receive_locations.value(),
            ),
            (
                "AutoResumeOrchestrationInstanceFlag",
                self.auto_resume_instances.value(),
            ),
            ("AutoStartSendPortsFlag", self.auto_start_send_ports.value()),
        ]
    }
}

impl Default for StartFlags {
    fn default() -> Self {
        Self::WMI_DEFAULT
    }
}

/// Arguments of `MSBTS_Orchestration.Stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopFlags {
    pub auto_disable_receive_locations: AutoFlag,
    pub auto_suspend_instances: AutoFlag,
}

impl StopFlags {
    /// Defaults documented for the WMI method: (1, 2).
    pub const WMI_DEFAULT: Self = Self {
        auto_disable_receive_locations: AutoFlag::NoAutoAction,
        auto_suspend_instances: AutoFlag::Automatic,
    };

    #[must_use]
    pub const fn arguments(&self) -> [(&'static str, u32); 2] {
        [
            (
                "AutoDisableReceiveLocationFlag",
                self.auto_disable_receive_locations.value(),
            ),
            (
                "AutoSuspendOrchestrationInstanceFlag",
                self.auto_suspend_instances.value(),
            ),
        ]
    }
}

impl Default for StopFlags {
    fn default() -> Self {
        Self::WMI_DEFAULT
    }
}

/// Arguments of `MSBTS_Orchestration.Unenlist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnenlistFlags {
    pub auto_terminate_instances: AutoFlag,
}

impl UnenlistFlags {
    /// Default documented for the WMI method: keep instances (1).
    pub const WMI_DEFAULT: Self = Self {
        auto_terminate_instances: AutoFlag::NoAutoAction,
    };

    /// Terminate every instance of the orchestration (2).
    pub const TERMINATE: Self = Self {
        auto_terminate_instances: AutoFlag::Automatic,
    };

    #[must_use]
    pub const fn arguments(&self) -> [(&'static str, u32); 1] {
        [(
            "AutoTerminateOrchestrationInstanceFlag",
            self.auto_terminate_instances.value(),
        )]
    }
}

impl Default for UnenlistFlags {
    fn default() -> Self {
        Self::WMI_DEFAULT
    }
}
