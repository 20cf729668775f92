//! Stable exit codes for the provisioner CLI.

/// Command succeeded.
pub const OK: i32 = 0;
/// A step failed, or the config/environment was invalid.
pub const FAILED: i32 = 1;
/// The operator declined the confirmation gate. Shares the value of
/// [`FAILED`] so scripts that only test for non-zero keep working.
pub const ABORTED: i32 = 1;
