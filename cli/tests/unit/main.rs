//! Unit tests for btsctl
//!
//! These tests run the lifecycle services against in-memory fakes of the
//! management backend and the catalog, without external I/O.

mod helpers;
mod orchestration_lifecycle;
mod property_tests;
mod receive_location;
