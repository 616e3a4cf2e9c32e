//! Orchestration controller over the `MSBTS_Orchestration` management class.

use btsctl_common::{LifecycleStage, OrchestrationStatus, StartFlags, StopFlags, UnenlistFlags};
use tracing::{debug, trace};

use crate::application::ports::{ManagementBackend, ManagementSession};
use crate::application::services::lifecycle::ManagedResource;
use crate::domain::{LifecycleError, ManagementPath, OrchestrationType, TypeDescriptor};

const STATUS_PROPERTY: &str = "OrchestrationStatus";

/// Lifecycle handle on one orchestration.
///
/// Holds the most recently acquired management object. Every primitive is a
/// method invocation followed by a re-acquisition; `status()` re-acquires too.
/// The object is released on drop.
pub struct OrchestrationController<'b, B: ManagementBackend + 'b> {
    backend: &'b B,
    orchestration: OrchestrationType,
    path: ManagementPath,
    session: Option<B::Session<'b>>,
    start_flags: StartFlags,
    stop_flags: StopFlags,
    unenlist_flags: UnenlistFlags,
}

impl<'b, B: ManagementBackend + 'b> OrchestrationController<'b, B> {
    /// Bind a controller to the orchestration described by `descriptor` on `computer`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` without contacting the backend if the type is not
    /// an orchestration, and `BackendUnavailable` if its management object cannot
    /// be fetched.
    pub fn new(backend: &'b B, descriptor: TypeDescriptor, computer: &str) -> Result<Self, LifecycleError> {
        let orchestration = OrchestrationType::try_from(descriptor)?;
        let path = orchestration.management_path(computer);
        debug!(%path, "acquiring orchestration");
        let session = backend.acquire(&path)?;
        Ok(Self {
            backend,
            orchestration,
            path,
            session: Some(session),
            start_flags: StartFlags::AUTOMATIC,
            stop_flags: StopFlags::WMI_DEFAULT,
            unenlist_flags: UnenlistFlags::TERMINATE,
        })
    }

    /// Flags used by `ManagedResource::start`, including from `ensure_started`.
    #[must_use]
    pub fn with_start_flags(mut self, flags: StartFlags) -> Self {
        self.start_flags = flags;
        self
    }

    /// Flags used by `ManagedResource::stop`.
    #[must_use]
    pub fn with_stop_flags(mut self, flags: StopFlags) -> Self {
        self.stop_flags = flags;
        self
    }

    /// Flags used by `ManagedResource::unenlist`.
    #[must_use]
    pub fn with_unenlist_flags(mut self, flags: UnenlistFlags) -> Self {
        self.unenlist_flags = flags;
        self
    }

    #[must_use]
    pub fn orchestration(&self) -> &OrchestrationType {
        &self.orchestration
    }

    #[must_use]
    pub fn management_path(&self) -> &ManagementPath {
        &self.path
    }

    /// Current status, read from a freshly acquired management object.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the object cannot be fetched and
    /// `UnrecognizedState` for a status code outside the known set.
    pub fn status(&mut self) -> Result<OrchestrationStatus, LifecycleError> {
        self.refresh()?;
        let code = self.session()?.property(STATUS_PROPERTY)?;
        trace!(orchestration = %self.orchestration, %code, "status read");
        Ok(OrchestrationStatus::from_wmi_code(&code)?)
    }

    /// Start with explicit automatic-action flags.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the backend rejects the call.
    pub fn start_with(&mut self, flags: StartFlags) -> Result<(), LifecycleError> {
        debug!(orchestration = %self.orchestration, ?flags, "starting");
        self.invoke("Start", &flags.arguments())
    }

    /// Stop with explicit automatic-action flags.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the backend rejects the call.
    pub fn stop_with(&mut self, flags: StopFlags) -> Result<(), LifecycleError> {
        debug!(orchestration = %self.orchestration, ?flags, "stopping");
        self.invoke("Stop", &flags.arguments())
    }

    /// Unenlist with an explicit instance-termination flag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the backend rejects the call, including
    /// when the orchestration is still started.
    pub fn unenlist_with(&mut self, flags: UnenlistFlags) -> Result<(), LifecycleError> {
        debug!(orchestration = %self.orchestration, ?flags, "unenlisting");
        self.invoke("Unenlist", &flags.arguments())
    }

    /// Release the management object now instead of at drop.
    pub fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            trace!(path = %self.path, "releasing management object");
            session.release();
        }
    }

    fn invoke(&mut self, method: &'static str, args: &[(&str, u32)]) -> Result<(), LifecycleError> {
        self.session_mut()?.invoke(method, args)?;
        self.refresh()
    }

    /// Replace the held object with a fresh acquisition of the same path.
    fn refresh(&mut self) -> Result<(), LifecycleError> {
        trace!(path = %self.path, "refreshing management object");
        let fresh = self.backend.acquire(&self.path)?;
        self.release();
        self.session = Some(fresh);
        Ok(())
    }

    fn session(&self) -> Result<&B::Session<'b>, LifecycleError> {
        self.session.as_ref().ok_or_else(released)
    }

    fn session_mut(&mut self) -> Result<&mut B::Session<'b>, LifecycleError> {
        self.session.as_mut().ok_or_else(released)
    }
}

fn released() -> LifecycleError {
    LifecycleError::BackendUnavailable("management object has been released".to_string())
}

impl<'b, B: ManagementBackend + 'b> ManagedResource for OrchestrationController<'b, B> {
    fn describe(&self) -> String {
        format!("orchestration '{}'", self.orchestration)
    }

    fn stage(&mut self) -> Result<LifecycleStage, LifecycleError> {
        self.status().map(LifecycleStage::from)
    }

    fn enlist(&mut self) -> Result<(), LifecycleError> {
        debug!(orchestration = %self.orchestration, "enlisting");
        self.invoke("Enlist", &[])
    }

    fn start(&mut self) -> Result<(), LifecycleError> {
        self.start_with(self.start_flags)
    }

    fn stop(&mut self) -> Result<(), LifecycleError> {
        self.stop_with(self.stop_flags)
    }

    fn unenlist(&mut self) -> Result<(), LifecycleError> {
        self.unenlist_with(self.unenlist_flags)
    }
}

impl<'b, B: ManagementBackend + 'b> Drop for OrchestrationController<'b, B> {
    fn drop(&mut self) {
        self.release();
    }
}
