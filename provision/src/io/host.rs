//! Facts about the invoking user and the host's account database.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use super::process::{CommandRunner, CommandSpec, run_checked};
use crate::core::accounts::{is_member, parse_groups};

/// Process environment the provisioner starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    pub home: PathBuf,
    /// Value of `$SHELL`.
    pub shell: Option<String>,
    /// Value of `$USER`.
    pub user: Option<String>,
    /// Value of `$PATH`.
    pub path: Option<String>,
    pub cwd: PathBuf,
}

impl HostEnv {
    pub fn from_process() -> Result<Self> {
        let home = env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set"))?;
        Ok(Self {
            home,
            shell: env::var("SHELL").ok(),
            user: env::var("USER").ok().filter(|user| !user.trim().is_empty()),
            path: env::var("PATH").ok(),
            cwd: env::current_dir().context("read current directory")?,
        })
    }
}

/// The invoking user: `$USER`, falling back to `id -un`.
pub fn invoking_user(runner: &dyn CommandRunner, host: &HostEnv) -> Result<String> {
    if let Some(user) = &host.user {
        return Ok(user.trim().to_string());
    }
    let output = run_checked(runner, &CommandSpec::new("id").arg("-un").captured())?;
    let user = output.stdout.trim().to_string();
    if user.is_empty() {
        return Err(anyhow!("id -un returned an empty user name"));
    }
    Ok(user)
}

/// `getent group` exits 0 when found and 2 when the key is unknown.
pub fn group_exists(runner: &dyn CommandRunner, group: &str) -> Result<bool> {
    let spec = CommandSpec::new("getent").args(["group", group]).captured();
    let output = runner.run(&spec)?;
    match output.code {
        Some(0) => Ok(true),
        Some(2) => Ok(false),
        code => Err(anyhow!(
            "{} failed (exit status {}): {}",
            spec.display(),
            code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            output.stderr.trim()
        )),
    }
}

pub fn user_in_group(runner: &dyn CommandRunner, user: &str, group: &str) -> Result<bool> {
    let output = run_checked(runner, &CommandSpec::new("id").args(["-nG", user]).captured())?;
    let groups = parse_groups(&output.stdout);
    debug!(user, ?groups, "group membership");
    Ok(is_member(&groups, group))
}
