//! Shared test doubles: an in-memory BizTalk group that records every remote call.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use btsctl::application::ports::{CatalogExplorer, ManagementBackend, ManagementSession, ProgressReporter};
use btsctl::domain::identity::BTX_SERVICE_TYPE;
use btsctl::domain::{
    ApplicationRecord, LifecycleError, ManagementDatabase, ManagementPath, OrchestrationEntry,
    ReceiveLocationEntry, ReceivePortEntry, SendPortEntry, TypeDescriptor,
};
use btsctl_common::{OrchestrationStatus, PortStatus};

pub const ORDERS_ASSEMBLY: &str =
    "Orders.Orchestrations, Version=1.0.0.0, Culture=neutral, PublicKeyToken=0123456789abcdef";

pub const ORDERS_PROCESS: &str = "Orders.Orchestrations.Process";

// ── Descriptors ──────────────────────────────────────────────────────────────

pub fn orchestration_descriptor() -> TypeDescriptor {
    TypeDescriptor {
        full_name: ORDERS_PROCESS.to_string(),
        assembly: ORDERS_ASSEMBLY.parse().expect("valid assembly name"),
        base_types: vec![
            BTX_SERVICE_TYPE.to_string(),
            "Microsoft.XLANGs.Core.ServiceContext".to_string(),
            "System.Object".to_string(),
        ],
    }
}

/// A helper class living in the same assembly, not an orchestration.
pub fn plain_descriptor() -> TypeDescriptor {
    TypeDescriptor {
        full_name: "Orders.Orchestrations.Helpers".to_string(),
        assembly: ORDERS_ASSEMBLY.parse().expect("valid assembly name"),
        base_types: vec!["System.Object".to_string()],
    }
}

// ── Management backend ───────────────────────────────────────────────────────

/// One remote call observed by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire(String),
    Invoke(&'static str, Vec<(String, u32)>),
    Release,
}

/// In-memory `MSBTS_Orchestration` instance enforcing the provider's preconditions:
/// enlist from unenlisted, start from enlisted, stop from started, unenlist from enlisted.
pub struct FakeOrchestration {
    code: RefCell<String>,
    calls: RefCell<Vec<Call>>,
    reachable: Cell<bool>,
}

impl FakeOrchestration {
    pub fn new(status: OrchestrationStatus) -> Self {
        Self::with_code(status.wmi_code())
    }

    /// Report a raw status code, including ones outside the known set.
    pub fn with_code(code: &str) -> Self {
        Self {
            code: RefCell::new(code.to_string()),
            calls: RefCell::new(Vec::new()),
            reachable: Cell::new(true),
        }
    }

    pub fn unreachable() -> Self {
        let fake = Self::new(OrchestrationStatus::Unenlisted);
        fake.reachable.set(false);
        fake
    }

    pub fn status(&self) -> OrchestrationStatus {
        OrchestrationStatus::from_wmi_code(&self.code.borrow()).expect("known status")
    }

    /// Change the status behind the controller's back.
    pub fn set_status(&self, status: OrchestrationStatus) {
        *self.code.borrow_mut() = status.wmi_code().to_string();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn acquisitions(&self) -> usize {
        self.count(|c| matches!(c, Call::Acquire(_)))
    }

    pub fn invocations(&self) -> Vec<&'static str> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Invoke(method, _) => Some(*method),
                _ => None,
            })
            .collect()
    }

    pub fn releases(&self) -> usize {
        self.count(|c| matches!(c, Call::Release))
    }

    fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| f(c)).count()
    }

    fn transition(&self, method: &'static str) -> Result<(), LifecycleError> {
        use OrchestrationStatus::{Enlisted, Started, Unenlisted};
        let next = match (method, self.status()) {
            ("Enlist", Unenlisted) | ("Stop", Started) => Enlisted,
            ("Start", Enlisted) => Started,
            ("Unenlist", Enlisted) => Unenlisted,
            (_, current) => {
                return Err(LifecycleError::InvalidTransition {
                    resource: format!("orchestration '{ORDERS_PROCESS}'"),
                    verb: method,
                    reason: format!("{method} is not valid while {current}"),
                });
            }
        };
        self.set_status(next);
        Ok(())
    }
}

impl ManagementBackend for FakeOrchestration {
    type Session<'a> = FakeSession<'a>;

    fn acquire(&self, path: &ManagementPath) -> Result<FakeSession<'_>, LifecycleError> {
        self.calls.borrow_mut().push(Call::Acquire(path.to_string()));
        if !self.reachable.get() {
            return Err(LifecycleError::BackendUnavailable(format!("no management object at {path}")));
        }
        Ok(FakeSession {
            fake: self,
            code: Some(self.code.borrow().clone()),
        })
    }
}

pub struct FakeSession<'a> {
    fake: &'a FakeOrchestration,
    code: Option<String>,
}

impl ManagementSession for FakeSession<'_> {
    fn property(&self, name: &str) -> Result<String, LifecycleError> {
        match (name, &self.code) {
            ("OrchestrationStatus", Some(code)) => Ok(code.clone()),
            _ => Err(LifecycleError::BackendUnavailable(format!("no property {name}"))),
        }
    }

    fn invoke(&mut self, method: &'static str, args: &[(&str, u32)]) -> Result<(), LifecycleError> {
        self.fake.calls.borrow_mut().push(Call::Invoke(
            method,
            args.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
        ));
        self.fake.transition(method)
    }

    fn release(&mut self) {
        if self.code.take().is_some() {
            self.fake.calls.borrow_mut().push(Call::Release);
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

/// In-memory catalog of one group holding a single application.
pub struct FakeCatalog {
    database: ManagementDatabase,
    record: RefCell<ApplicationRecord>,
    reads: Cell<usize>,
    writes: RefCell<Vec<String>>,
}

impl FakeCatalog {
    pub fn new(record: ApplicationRecord) -> Self {
        Self {
            database: ManagementDatabase::new("SQLHOST", "BizTalkMgmtDb").expect("valid database"),
            record: RefCell::new(record),
            reads: Cell::new(0),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// `Orders` with one orchestration, one send port and one receive location.
    pub fn orders(port: PortStatus, location_enabled: bool) -> Self {
        Self::new(ApplicationRecord {
            name: "Orders".to_string(),
            orchestrations: vec![OrchestrationEntry {
                full_name: ORDERS_PROCESS.to_string(),
                assembly: ORDERS_ASSEMBLY.parse().expect("valid assembly name"),
            }],
            send_ports: vec![SendPortEntry {
                name: "OrdersOut".to_string(),
                status: port,
            }],
            receive_ports: vec![ReceivePortEntry {
                name: "OrdersIn".to_string(),
                receive_locations: vec![ReceiveLocationEntry {
                    name: "OrdersIn.FILE".to_string(),
                    enabled: location_enabled,
                }],
            }],
        })
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn send_port_status(&self, name: &str) -> PortStatus {
        self.record
            .borrow()
            .send_ports
            .iter()
            .find(|p| p.name == name)
            .expect("send port exists")
            .status
    }

    /// Change a send port status behind the controller's back.
    pub fn set_send_port_status(&self, name: &str, status: PortStatus) {
        if let Some(port) = self.record.borrow_mut().send_ports.iter_mut().find(|p| p.name == name) {
            port.status = status;
        }
    }

    pub fn reset_counters(&self) {
        self.reads.set(0);
        self.writes.borrow_mut().clear();
    }

    fn check_application(&self, name: &str) -> Result<(), LifecycleError> {
        if self.record.borrow().name == name {
            Ok(())
        } else {
            Err(self.not_found("BizTalk Server Application", name))
        }
    }

    fn not_found(&self, kind: &'static str, name: &str) -> LifecycleError {
        LifecycleError::NotFound {
            kind,
            name: name.to_string(),
            group: self.database.to_string(),
        }
    }
}

impl CatalogExplorer for FakeCatalog {
    fn management_database(&self) -> &ManagementDatabase {
        &self.database
    }

    fn application(&self, name: &str) -> Result<ApplicationRecord, LifecycleError> {
        self.reads.set(self.reads.get() + 1);
        self.check_application(name)?;
        Ok(self.record.borrow().clone())
    }

    fn apply_send_port_status(
        &self,
        application: &str,
        send_port: &str,
        status: PortStatus,
    ) -> Result<(), LifecycleError> {
        self.check_application(application)?;
        let mut record = self.record.borrow_mut();
        let port = record
            .send_ports
            .iter_mut()
            .find(|p| p.name == send_port)
            .ok_or_else(|| self.not_found("BizTalk Send Port", send_port))?;
        port.status = status;
        self.writes.borrow_mut().push(format!("{send_port}={status}"));
        Ok(())
    }

    fn apply_receive_location_enabled(
        &self,
        application: &str,
        receive_port: &str,
        receive_location: &str,
        enabled: bool,
    ) -> Result<(), LifecycleError> {
        self.check_application(application)?;
        let mut record = self.record.borrow_mut();
        let location = record
            .receive_ports
            .iter_mut()
            .find(|p| p.name == receive_port)
            .and_then(|p| p.receive_locations.iter_mut().find(|l| l.name == receive_location))
            .ok_or_else(|| self.not_found("BizTalk Receive Location", receive_location))?;
        location.enabled = enabled;
        self.writes
            .borrow_mut()
            .push(format!("{receive_location}.Enable={enabled}"));
        Ok(())
    }
}

// ── Progress ─────────────────────────────────────────────────────────────────

/// Collects progress messages instead of printing them.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
}
