//! Orchestration controller against an in-memory management backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use btsctl::application::services::lifecycle::{
    self, LifecycleVerb, ManagedResource, OrchestrationController,
};
use btsctl::domain::LifecycleError;
use btsctl_common::{
    AutoFlag, LifecycleStage, OrchestrationStatus, StartFlags, StopFlags, UnenlistFlags,
};

use crate::helpers::{
    Call, FakeOrchestration, ORDERS_PROCESS, RecordingReporter, orchestration_descriptor,
    plain_descriptor,
};

const PATH: &str = r"\\.\root\MicrosoftBizTalkServer:MSBTS_Orchestration.AssemblyCulture='neutral',AssemblyName='Orders.Orchestrations',AssemblyPublicKeyToken='0123456789abcdef',AssemblyVersion='1.0.0.0',Name='Orders.Orchestrations.Process'";

fn controller(fake: &FakeOrchestration) -> OrchestrationController<'_, FakeOrchestration> {
    OrchestrationController::new(fake, orchestration_descriptor(), ".").expect("controller binds")
}

// ── Binding ──────────────────────────────────────────────────────────────────

#[test]
fn non_orchestration_type_never_reaches_backend() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let err = OrchestrationController::new(&fake, plain_descriptor(), ".")
        .err()
        .expect("helper type is rejected");
    assert!(matches!(err, LifecycleError::InvalidArgument(_)));
    assert_eq!(err.code(), "invalid_argument");
    assert!(fake.calls().is_empty());
}

#[test]
fn binding_acquires_the_orchestration_path() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let c = controller(&fake);
    assert_eq!(c.management_path().to_string(), PATH);
    assert_eq!(fake.calls(), vec![Call::Acquire(PATH.to_string())]);
}

#[test]
fn unreachable_backend_is_backend_unavailable() {
    let fake = FakeOrchestration::unreachable();
    let err = OrchestrationController::new(&fake, orchestration_descriptor(), ".")
        .err()
        .expect("acquire fails");
    assert_eq!(err.code(), "backend_unavailable");
}

// ── Status ───────────────────────────────────────────────────────────────────

#[test]
fn status_observes_changes_made_elsewhere() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let mut c = controller(&fake);
    assert_eq!(c.status().unwrap(), OrchestrationStatus::Enlisted);
    fake.set_status(OrchestrationStatus::Started);
    assert_eq!(c.status().unwrap(), OrchestrationStatus::Started);
}

#[test]
fn unknown_status_code_is_unrecognized_state() {
    let fake = FakeOrchestration::with_code("7");
    let mut c = controller(&fake);
    let err = c.status().unwrap_err();
    assert!(matches!(err, LifecycleError::UnrecognizedState(_)));
    assert_eq!(err.code(), "unrecognized_state");
}

#[test]
fn unbound_code_is_not_a_lifecycle_stage() {
    let fake = FakeOrchestration::with_code("1");
    let mut c = controller(&fake);
    assert_eq!(c.stage().unwrap_err().code(), "unrecognized_state");
}

// ── Primitives ───────────────────────────────────────────────────────────────

#[test]
fn start_passes_configured_flags() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let mut c = controller(&fake).with_start_flags(StartFlags::WMI_DEFAULT);
    fake.clear_calls();
    c.start().unwrap();
    assert_eq!(
        fake.calls()[0],
        Call::Invoke(
            "Start",
            vec![
                ("AutoEnableReceiveLocationFlag".to_string(), 1),
                ("AutoResumeOrchestrationInstanceFlag".to_string(), 2),
                ("AutoStartSendPortsFlag".to_string(), 2),
            ]
        )
    );
    assert_eq!(fake.status(), OrchestrationStatus::Started);
}

#[test]
fn default_flags_start_everything_and_terminate_on_unenlist() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Started);
    let mut c = controller(&fake);
    fake.clear_calls();
    c.ensure_unenlisted().unwrap();
    let invokes: Vec<Call> = fake
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Invoke(..)))
        .collect();
    assert_eq!(
        invokes,
        vec![
            Call::Invoke(
                "Stop",
                vec![
                    ("AutoDisableReceiveLocationFlag".to_string(), 1),
                    ("AutoSuspendOrchestrationInstanceFlag".to_string(), 2),
                ]
            ),
            Call::Invoke(
                "Unenlist",
                vec![("AutoTerminateOrchestrationInstanceFlag".to_string(), 2)]
            ),
        ]
    );
}

#[test]
fn explicit_flags_override_stored_ones() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Started);
    let mut c = controller(&fake);
    c.stop_with(StopFlags {
        auto_disable_receive_locations: AutoFlag::Automatic,
        auto_suspend_instances: AutoFlag::NoAutoAction,
    })
    .unwrap();
    c.unenlist_with(UnenlistFlags::WMI_DEFAULT).unwrap();
    assert!(fake.calls().contains(&Call::Invoke(
        "Unenlist",
        vec![("AutoTerminateOrchestrationInstanceFlag".to_string(), 1)]
    )));
    assert_eq!(fake.status(), OrchestrationStatus::Unenlisted);
}

#[test]
fn primitive_reacquires_after_invoking() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Unenlisted);
    let mut c = controller(&fake);
    fake.clear_calls();
    c.enlist().unwrap();
    assert_eq!(
        fake.calls(),
        vec![
            Call::Invoke("Enlist", vec![]),
            Call::Acquire(PATH.to_string()),
            Call::Release,
        ]
    );
}

#[test]
fn backend_rejection_is_invalid_transition() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Started);
    let mut c = controller(&fake);
    let err = c.unenlist().unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidTransition { verb: "Unenlist", .. }));
    assert!(err.is_retryable());
    assert_eq!(fake.status(), OrchestrationStatus::Started);
}

// ── Ensure algebra ───────────────────────────────────────────────────────────

#[test]
fn ensure_started_from_unenlisted_enlists_then_starts() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Unenlisted);
    let mut c = controller(&fake);
    fake.clear_calls();
    c.ensure_started().unwrap();
    let read = || [Call::Acquire(PATH.to_string()), Call::Release];
    let start_args = StartFlags::AUTOMATIC
        .arguments()
        .iter()
        .map(|(name, value)| ((*name).to_string(), *value))
        .collect();
    let expected: Vec<Call> = [
        // ensure_started and ensure_not_unenlisted each read the status
        read().to_vec(),
        read().to_vec(),
        vec![Call::Invoke("Enlist", vec![])],
        read().to_vec(),
        vec![Call::Invoke("Start", start_args)],
        read().to_vec(),
    ]
    .concat();
    assert_eq!(fake.calls(), expected);
    assert_eq!(fake.status(), OrchestrationStatus::Started);
}

#[test]
fn ensure_started_when_started_only_reads() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Started);
    let mut c = controller(&fake);
    c.ensure_started().unwrap();
    assert!(fake.invocations().is_empty());
}

#[test]
fn ensure_not_unenlisted_leaves_started_alone() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Started);
    let mut c = controller(&fake);
    c.ensure_not_unenlisted().unwrap();
    assert!(fake.invocations().is_empty());
    assert_eq!(fake.status(), OrchestrationStatus::Started);
}

#[test]
fn ensure_not_started_from_enlisted_is_a_no_op() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let mut c = controller(&fake);
    c.ensure_not_started().unwrap();
    assert!(fake.invocations().is_empty());
}

#[test]
fn repeated_ensure_is_idempotent() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Unenlisted);
    let mut c = controller(&fake);
    c.ensure_started().unwrap();
    c.ensure_started().unwrap();
    assert_eq!(fake.invocations(), ["Enlist", "Start"]);
}

// ── apply + release ──────────────────────────────────────────────────────────

#[test]
fn apply_reports_transition_and_progress() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let mut c = controller(&fake);
    let reporter = RecordingReporter::default();
    let transition = lifecycle::apply(&mut c, LifecycleVerb::EnsureStarted, &reporter).unwrap();
    assert_eq!(transition.before, LifecycleStage::Enlisted);
    assert_eq!(transition.after, LifecycleStage::Started);
    let messages = reporter.messages.borrow();
    assert_eq!(messages[0], format!("step: Starting orchestration '{ORDERS_PROCESS}'..."));
    assert!(messages[1].starts_with("success:"));
}

#[test]
fn drop_releases_the_management_object() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    {
        let mut c = controller(&fake);
        c.status().unwrap();
    }
    assert_eq!(fake.acquisitions(), fake.releases());
    assert_eq!(fake.calls().last(), Some(&Call::Release));
}

#[test]
fn explicit_release_is_not_repeated_on_drop() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let mut c = controller(&fake);
    c.release();
    c.release();
    drop(c);
    assert_eq!(fake.releases(), 1);
}

#[test]
fn released_controller_reacquires_for_status() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Enlisted);
    let mut c = controller(&fake);
    c.release();
    assert_eq!(c.status().unwrap(), OrchestrationStatus::Enlisted);
}

#[test]
fn enlist_then_unenlist_returns_to_unenlisted() {
    let fake = FakeOrchestration::new(OrchestrationStatus::Unenlisted);
    let mut c = controller(&fake);
    c.enlist().unwrap();
    c.unenlist().unwrap();
    assert_eq!(c.status().unwrap(), OrchestrationStatus::Unenlisted);
    assert_eq!(fake.invocations(), ["Enlist", "Unenlist"]);
}
