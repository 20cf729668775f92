//! Replace the provisioner with the user's interactive shell.

use std::os::unix::process::CommandExt;
use std::process::Command;

use anyhow::{Context, Result};

use crate::core::shell::Shell;

/// Command that starts `shell` with the session environment applied.
pub fn handoff_command(shell: &Shell, env: &[(String, String)]) -> Option<Command> {
    if !shell.is_supported() {
        return None;
    }
    let mut cmd = Command::new(shell.name());
    cmd.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    Some(cmd)
}

/// Exec into the interactive shell. Only returns on failure, or after printing
/// a notice for unsupported shells.
pub fn hand_off(shell: &Shell, env: &[(String, String)]) -> Result<()> {
    let Some(mut cmd) = handoff_command(shell, env) else {
        println!(
            "Shell '{}' is not configured automatically; add the Hadoop variables to its profile and start a new session",
            shell.name()
        );
        return Ok(());
    };
    println!("Starting a new {} session with the Hadoop environment", shell.name());
    let err = cmd.exec();
    Err(err).with_context(|| format!("exec {}", shell.name()))
}
