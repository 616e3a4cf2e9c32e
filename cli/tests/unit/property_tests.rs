//! Property-based tests for the ensure algebra and configuration validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use btsctl::application::services::lifecycle::{ManagedResource, OrchestrationController, SendPortController};
use btsctl::domain::config::VALID_CONFIG_KEYS;
use btsctl::domain::{validate_config_key, validate_config_value};
use btsctl_common::{LifecycleStage, OrchestrationStatus, PortStatus};

use crate::helpers::{FakeCatalog, FakeOrchestration, orchestration_descriptor};

#[derive(Debug, Clone, Copy)]
enum Ensure {
    Started,
    NotStarted,
    Unenlisted,
    NotUnenlisted,
}

impl Ensure {
    fn run(self, resource: &mut impl ManagedResource) {
        match self {
            Self::Started => resource.ensure_started(),
            Self::NotStarted => resource.ensure_not_started(),
            Self::Unenlisted => resource.ensure_unenlisted(),
            Self::NotUnenlisted => resource.ensure_not_unenlisted(),
        }
        .expect("ensure never violates a backend precondition");
    }

    fn holds(self, stage: LifecycleStage) -> bool {
        match self {
            Self::Started => stage == LifecycleStage::Started,
            Self::NotStarted => stage != LifecycleStage::Started,
            Self::Unenlisted => stage == LifecycleStage::Unenlisted,
            Self::NotUnenlisted => stage != LifecycleStage::Unenlisted,
        }
    }
}

fn any_ensure() -> impl Strategy<Value = Ensure> {
    prop_oneof![
        Just(Ensure::Started),
        Just(Ensure::NotStarted),
        Just(Ensure::Unenlisted),
        Just(Ensure::NotUnenlisted),
    ]
}

fn any_orchestration_status() -> impl Strategy<Value = OrchestrationStatus> {
    prop_oneof![
        Just(OrchestrationStatus::Unenlisted),
        Just(OrchestrationStatus::Enlisted),
        Just(OrchestrationStatus::Started),
    ]
}

fn any_port_status() -> impl Strategy<Value = PortStatus> {
    prop_oneof![
        Just(PortStatus::Bound),
        Just(PortStatus::Stopped),
        Just(PortStatus::Started),
    ]
}

// ============================================================================
// Ensure operations on orchestrations
// ============================================================================

proptest! {
    /// Every ensure reaches its target from any start, with at most two method calls.
    #[test]
    fn prop_orchestration_ensure_converges(start in any_orchestration_status(), op in any_ensure()) {
        let fake = FakeOrchestration::new(start);
        let mut c = OrchestrationController::new(&fake, orchestration_descriptor(), ".").unwrap();
        op.run(&mut c);
        prop_assert!(op.holds(c.stage().unwrap()), "{op:?} from {start} ended at {}", fake.status());
        prop_assert!(fake.invocations().len() <= 2);
    }

    /// A second application of the same ensure invokes nothing.
    #[test]
    fn prop_orchestration_ensure_is_idempotent(start in any_orchestration_status(), op in any_ensure()) {
        let fake = FakeOrchestration::new(start);
        let mut c = OrchestrationController::new(&fake, orchestration_descriptor(), ".").unwrap();
        op.run(&mut c);
        let after_first = fake.invocations().len();
        op.run(&mut c);
        prop_assert_eq!(fake.invocations().len(), after_first);
    }

    /// Any sequence of ensures leaves the orchestration where the last one aimed.
    #[test]
    fn prop_orchestration_ensure_sequences(
        start in any_orchestration_status(),
        ops in prop::collection::vec(any_ensure(), 1..8),
    ) {
        let fake = FakeOrchestration::new(start);
        let mut c = OrchestrationController::new(&fake, orchestration_descriptor(), ".").unwrap();
        for op in &ops {
            op.run(&mut c);
        }
        let last = *ops.last().expect("non-empty");
        prop_assert!(last.holds(c.stage().unwrap()));
    }
}

// ============================================================================
// Ensure operations on send ports
// ============================================================================

proptest! {
    /// Send ports converge with at most two catalog writes.
    #[test]
    fn prop_send_port_ensure_converges(start in any_port_status(), op in any_ensure()) {
        let catalog = FakeCatalog::orders(start, true);
        let mut p = SendPortController::new(&catalog, "Orders", "OrdersOut").unwrap();
        op.run(&mut p);
        prop_assert!(op.holds(p.stage().unwrap()));
        prop_assert!(catalog.writes().len() <= 2);
        op.run(&mut p);
        prop_assert!(catalog.writes().len() <= 2, "second run wrote: {:?}", catalog.writes());
    }
}

// ============================================================================
// validate_config_key() and validate_config_value() property tests
// ============================================================================

proptest! {
    /// Keys outside the whitelist are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z_]{1,20}\\.[a-z_]{1,20}") {
        if !VALID_CONFIG_KEYS.contains(&key.as_str()) {
            prop_assert!(validate_config_key(&key).is_err(), "accepted invalid key: {key}");
        }
    }

    /// Positive timeouts are accepted, everything else non-numeric is not.
    #[test]
    fn prop_timeout_values(n in 1u32..=u32::MAX, junk in "[a-z]{1,10}") {
        prop_assert!(validate_config_value("wmi.operation_timeout_secs", &n.to_string()).is_ok());
        prop_assert!(validate_config_value("wmi.operation_timeout_secs", &junk).is_err());
    }

    /// Blank values are rejected for string keys.
    #[test]
    fn prop_blank_values_rejected(blank in "[ \\t]{0,5}") {
        prop_assert!(validate_config_value("wmi.computer", &blank).is_err());
        prop_assert!(validate_config_value("management_database.server", &blank).is_err());
    }
}

#[test]
fn every_whitelisted_key_is_accepted() {
    for key in VALID_CONFIG_KEYS {
        validate_config_key(key).expect("whitelisted key");
    }
}

#[test]
fn zero_timeout_is_rejected() {
    assert!(validate_config_value("wmi.operation_timeout_secs", "0").is_err());
}
