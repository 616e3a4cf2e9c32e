//! Integration tests for btsctl
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them needs a BizTalk Server group to be reachable.

mod config_command;
