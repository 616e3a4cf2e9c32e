//! Resource lifecycle controllers.
//!
//! `ManagedResource` exposes the four primitive transitions of a resource and
//! derives the idempotent `ensure_*` operations from them. Orchestrations and
//! send ports implement the primitives; the ensure algebra lives here only.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

pub mod orchestration;
pub mod receive_location;
pub mod send_port;

use btsctl_common::LifecycleStage;
use tracing::debug;

use crate::application::ports::ProgressReporter;
use crate::domain::LifecycleError;

pub use orchestration::OrchestrationController;
pub use receive_location::ReceiveLocationController;
pub use send_port::SendPortController;

/// A resource driven through `Unenlisted < Enlisted < Started`.
///
/// Every `stage()` call is a remote read. Primitives refresh the handle after
/// their mutating call, so a following `stage()` observes the backend.
pub trait ManagedResource {
    /// Human-readable identity used in logs and messages.
    fn describe(&self) -> String;

    /// Current stage, read from the backend.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` or `UnrecognizedState` when the status cannot be read.
    fn stage(&mut self) -> Result<LifecycleStage, LifecycleError>;

    /// # Errors
    ///
    /// Propagates backend failures; a rejection is `InvalidTransition`.
    fn enlist(&mut self) -> Result<(), LifecycleError>;

    /// # Errors
    ///
    /// Propagates backend failures; a rejection is `InvalidTransition`.
    fn start(&mut self) -> Result<(), LifecycleError>;

    /// # Errors
    ///
    /// Propagates backend failures; a rejection is `InvalidTransition`.
    fn stop(&mut self) -> Result<(), LifecycleError>;

    /// # Errors
    ///
    /// Propagates backend failures; a rejection is `InvalidTransition`.
    fn unenlist(&mut self) -> Result<(), LifecycleError>;

    /// Drive the resource to `Started`, enlisting it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates the first failing read or primitive unmodified.
    fn ensure_started(&mut self) -> Result<(), LifecycleError> {
        debug!(resource = %self.describe(), "ensuring started");
        if self.stage()? == LifecycleStage::Started {
            return Ok(());
        }
        self.ensure_not_unenlisted()?;
        self.start()
    }

    /// Stop the resource if it is `Started`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing read or primitive unmodified.
    fn ensure_not_started(&mut self) -> Result<(), LifecycleError> {
        debug!(resource = %self.describe(), "ensuring not started");
        if self.stage()? == LifecycleStage::Started {
            self.stop()?;
        }
        Ok(())
    }

    /// Drive the resource to `Unenlisted`, stopping it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates the first failing read or primitive unmodified.
    fn ensure_unenlisted(&mut self) -> Result<(), LifecycleError> {
        debug!(resource = %self.describe(), "ensuring unenlisted");
        if self.stage()? == LifecycleStage::Unenlisted {
            return Ok(());
        }
        self.ensure_not_started()?;
        self.unenlist()
    }

    /// Enlist the resource if it is `Unenlisted`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing read or primitive unmodified.
    fn ensure_not_unenlisted(&mut self) -> Result<(), LifecycleError> {
        debug!(resource = %self.describe(), "ensuring not unenlisted");
        if self.stage()? == LifecycleStage::Unenlisted {
            self.enlist()?;
        }
        Ok(())
    }
}

/// Lifecycle verbs a caller can request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleVerb {
    Enlist,
    Start,
    Stop,
    Unenlist,
    EnsureStarted,
    EnsureNotStarted,
    EnsureUnenlisted,
    EnsureNotUnenlisted,
}

impl LifecycleVerb {
    /// Command-line spelling of the verb.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enlist => "enlist",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Unenlist => "unenlist",
            Self::EnsureStarted => "ensure-started",
            Self::EnsureNotStarted => "ensure-not-started",
            Self::EnsureUnenlisted => "ensure-unenlisted",
            Self::EnsureNotUnenlisted => "ensure-not-unenlisted",
        }
    }

    /// Progressive form used in progress messages.
    #[must_use]
    pub const fn progressive(self) -> &'static str {
        match self {
            Self::Enlist | Self::EnsureNotUnenlisted => "Enlisting",
            Self::Start | Self::EnsureStarted => "Starting",
            Self::Stop | Self::EnsureNotStarted => "Stopping",
            Self::Unenlist | Self::EnsureUnenlisted => "Unenlisting",
        }
    }

    /// `true` for verbs that may terminate running instances.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Unenlist | Self::EnsureUnenlisted)
    }
}

/// Stage of a resource before and after a verb was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Transition {
    pub before: LifecycleStage,
    pub after: LifecycleStage,
}

impl Transition {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Apply `verb` to `resource`, reporting progress and the observed transition.
///
/// # Errors
///
/// Propagates the `LifecycleError` raised by the verb or a status read.
pub fn apply(
    resource: &mut impl ManagedResource,
    verb: LifecycleVerb,
    reporter: &impl ProgressReporter,
) -> Result<Transition, LifecycleError> {
    let before = resource.stage()?;
    reporter.step(&format!("{} {}...", verb.progressive(), resource.describe()));
    match verb {
        LifecycleVerb::Enlist => resource.enlist()?,
        LifecycleVerb::Start => resource.start()?,
        LifecycleVerb::Stop => resource.stop()?,
        LifecycleVerb::Unenlist => resource.unenlist()?,
        LifecycleVerb::EnsureStarted => resource.ensure_started()?,
        LifecycleVerb::EnsureNotStarted => resource.ensure_not_started()?,
        LifecycleVerb::EnsureUnenlisted => resource.ensure_unenlisted()?,
        LifecycleVerb::EnsureNotUnenlisted => resource.ensure_not_unenlisted()?,
    }
    let after = resource.stage()?;
    let transition = Transition { before, after };
    if transition.changed() {
        reporter.success(&format!("{} is {after}", resource.describe()));
    } else {
        reporter.success(&format!("{} already {after}", resource.describe()));
    }
    Ok(transition)
}
