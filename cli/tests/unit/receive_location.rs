//! Receive location enable/disable against an in-memory catalog.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use btsctl::application::services::explorer::Application;
use btsctl::application::services::lifecycle::ReceiveLocationController;
use btsctl_common::PortStatus;

use crate::helpers::FakeCatalog;

fn location(catalog: &FakeCatalog) -> ReceiveLocationController<'_, FakeCatalog> {
    ReceiveLocationController::new(catalog, "Orders", "OrdersIn", "OrdersIn.FILE")
        .expect("receive location exists")
}

#[test]
fn disable_then_enable_round_trips_the_flag() {
    let catalog = FakeCatalog::orders(PortStatus::Started, true);
    let mut rl = location(&catalog);
    rl.disable().unwrap();
    assert!(!rl.is_enabled().unwrap());
    rl.enable().unwrap();
    assert!(rl.is_enabled().unwrap());
    assert_eq!(
        catalog.writes(),
        ["OrdersIn.FILE.Enable=false", "OrdersIn.FILE.Enable=true"]
    );
}

#[test]
fn enabling_an_enabled_location_does_not_write() {
    let catalog = FakeCatalog::orders(PortStatus::Started, true);
    let mut rl = location(&catalog);
    rl.enable().unwrap();
    assert!(catalog.writes().is_empty());
}

#[test]
fn unknown_receive_port_is_not_found() {
    let catalog = FakeCatalog::orders(PortStatus::Started, true);
    let err = ReceiveLocationController::new(&catalog, "Orders", "Nope", "OrdersIn.FILE")
        .err()
        .expect("missing port");
    assert_eq!(err.code(), "not_found");
    assert!(err.to_string().starts_with("BizTalk Receive Port 'Nope'"));
}

#[test]
fn unknown_receive_location_is_not_found() {
    let catalog = FakeCatalog::orders(PortStatus::Started, true);
    let app = Application::load(&catalog, "Orders").unwrap();
    let err = app.receive_location("OrdersIn", "Nope").err().expect("missing location");
    assert!(err.to_string().starts_with("BizTalk Receive Location 'Nope'"));
}

#[test]
fn application_hands_out_receive_location_controllers() {
    let catalog = FakeCatalog::orders(PortStatus::Started, false);
    let app = Application::load(&catalog, "Orders").unwrap();
    let mut rl = app.receive_location("OrdersIn", "OrdersIn.FILE").unwrap();
    assert_eq!(rl.name(), "OrdersIn.FILE");
    rl.enable().unwrap();
    assert_eq!(catalog.writes(), ["OrdersIn.FILE.Enable=true"]);
}
