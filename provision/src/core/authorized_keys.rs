//! `authorized_keys` content helpers.
//!
//! The provisioner appends the local public key on every run. A key that is
//! already authorized is reported, not suppressed.

/// True if any line of `existing` is exactly `public_key` (whitespace-trimmed).
pub fn contains_key(existing: &str, public_key: &str) -> bool {
    let key = public_key.trim();
    !key.is_empty() && existing.lines().any(|line| line.trim() == key)
}

/// Text to append so that `public_key` lands on its own line.
pub fn entry_to_append(existing: &str, public_key: &str) -> String {
    let mut entry = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        entry.push('\n');
    }
    entry.push_str(public_key.trim());
    entry.push('\n');
    entry
}
