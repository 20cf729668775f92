//! Passwordless SSH to localhost, required by Hadoop's control scripts.

use std::fs;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use super::StepContext;
use crate::core::answer::is_affirmative;
use crate::core::authorized_keys::{contains_key, entry_to_append};
use crate::core::types::{Step, StepReport};
use crate::io::fs::{append, read_or_empty, set_mode};
use crate::io::process::{CommandSpec, run_checked};

pub fn configure_ssh(ctx: &StepContext<'_>) -> Result<StepReport> {
    let paths = ctx.paths;
    let ssh = &ctx.config.ssh;
    println!("==> Configuring SSH for localhost");

    run_checked(
        ctx.runner,
        &ctx.privileged("apt-get")
            .args(["install", "-y", ssh.package.as_str()]),
    )
    .context("install SSH server")?;

    fs::create_dir_all(&paths.ssh_dir)
        .with_context(|| format!("create {}", paths.ssh_dir.display()))?;

    let generated = if paths.private_key.exists() {
        println!(
            "[SKIP] SSH key already exists at {}",
            paths.private_key.display()
        );
        false
    } else {
        let spec = CommandSpec::new("ssh-keygen").args([
            "-t".to_string(),
            "rsa".to_string(),
            "-P".to_string(),
            String::new(),
            "-f".to_string(),
            paths.private_key.display().to_string(),
        ]);
        run_checked(ctx.runner, &spec).context("generate SSH key pair")?;
        info!(key = %paths.private_key.display(), "ssh key generated");
        true
    };

    set_mode(&paths.ssh_dir, 0o700)?;
    authorize_public_key(ctx)?;
    set_mode(&paths.authorized_keys, 0o600)?;

    let enable_at_boot = match ctx.options.ssh_at_boot {
        Some(enable) => enable,
        None => is_affirmative(
            &ctx.prompter
                .ask("Enable the SSH server to start at boot? [y/N]")?,
        ),
    };
    if enable_at_boot {
        run_checked(
            ctx.runner,
            &ctx.privileged("systemctl")
                .args(["enable", ssh.service.as_str()]),
        )
        .context("enable SSH service at boot")?;
    } else {
        println!(
            "SSH will not start at boot; after a reboot run `sudo systemctl start {}` before starting Hadoop",
            ssh.service
        );
    }

    run_checked(
        ctx.runner,
        &ctx.privileged("systemctl")
            .args(["start", ssh.service.as_str()]),
    )
    .context("start SSH service")?;

    let key_note = if generated {
        "new key authorized"
    } else {
        "existing key authorized"
    };
    let boot_note = if enable_at_boot {
        "enabled at boot"
    } else {
        "not enabled at boot"
    };
    Ok(StepReport::applied(
        Step::Ssh,
        format!("{key_note}, {} {boot_note}", ssh.service),
    ))
}

/// Append the local public key to `authorized_keys`.
///
/// Appends on every run; an already-authorized key is logged, not skipped.
fn authorize_public_key(ctx: &StepContext<'_>) -> Result<()> {
    let paths = ctx.paths;
    let public_key = fs::read_to_string(&paths.public_key)
        .with_context(|| format!("read public key {}", paths.public_key.display()))?;
    if public_key.trim().is_empty() {
        return Err(anyhow!("public key {} is empty", paths.public_key.display()));
    }

    let existing = read_or_empty(&paths.authorized_keys)?;
    if contains_key(&existing, &public_key) {
        warn!(
            file = %paths.authorized_keys.display(),
            "public key already authorized; appending a duplicate entry"
        );
    }
    append(
        &paths.authorized_keys,
        &entry_to_append(&existing, &public_key),
    )
}
