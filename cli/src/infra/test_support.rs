//! Shared test helpers for infrastructure adapter tests.

#![allow(clippy::expect_used)]

use std::process::Output;

use crate::application::ports::CommandRunner;

mockall::mock! {
    pub Runner {}

    impl CommandRunner for Runner {
        fn run<'a>(&self, program: &str, args: &[&'a str]) -> anyhow::Result<Output>;
    }
}

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stderr: &[u8]) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// Read the script file a PowerShell invocation was handed with `-File`.
pub fn script_of(args: &[&str]) -> String {
    let at = args
        .iter()
        .position(|a| *a == "-File")
        .expect("-File argument");
    std::fs::read_to_string(args[at + 1]).expect("script file")
}
