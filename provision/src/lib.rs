//! Single-node Hadoop provisioner for Debian/Ubuntu hosts.
//!
//! The crate keeps decisions apart from side effects:
//!
//! - **[`core`]**: Pure logic (answer parsing, profile blocks, shell detection,
//!   authorized-key matching). No I/O.
//! - **[`io`]**: Config files, host paths, the filesystem, child processes and
//!   prompts. Every external command goes through [`io::process::CommandRunner`]
//!   so tests can script it.
//!
//! [`steps`] implements each idempotent provisioning step on top of both;
//! [`install`] runs them in order and [`status`] reports what is already in
//! place.

pub mod core;
pub mod exit_codes;
pub mod install;
pub mod io;
pub mod logging;
pub mod status;
pub mod steps;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
