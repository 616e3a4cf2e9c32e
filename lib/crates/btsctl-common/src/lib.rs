//! Shared types for btsctl: lifecycle status enumerations and management verb flags.
//!
//! Everything here mirrors a value that crosses the wire to the BizTalk management backend,
//! so representations (status codes, flag integers, method argument names) are fixed.

pub mod flags;
pub mod status;

pub use flags::{AutoFlag, StartFlags, StopFlags, UnenlistFlags};
pub use status::{LifecycleStage, OrchestrationStatus, ParseStatusError, PortStatus};
