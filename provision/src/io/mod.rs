//! I/O helpers for provisioning steps.

pub mod config;
pub mod fs;
pub mod host;
pub mod paths;
pub mod process;
pub mod profile;
pub mod prompt;
