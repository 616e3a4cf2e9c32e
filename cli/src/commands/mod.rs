//! Command implementations

pub mod config;
pub mod info;
pub mod orchestration;
pub mod receive_location;
pub mod send_port;
pub mod version;
