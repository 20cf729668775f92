//! Deterministic, pure logic shared by the provisioning steps.
//!
//! Core modules must be free of I/O side effects. They operate on strings and
//! paths and return deterministic outputs suitable for tests.

pub mod accounts;
pub mod answer;
pub mod authorized_keys;
pub mod profile;
pub mod shell;
pub mod types;
