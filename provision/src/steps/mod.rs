//! Provisioning steps, one module per pipeline stage.
//!
//! Each step either changes the host, skips because its precondition already
//! holds, or fails. A failure is fatal for the run; nothing is retried or
//! rolled back.

pub mod archive;
pub mod confirm;
pub mod handoff;
pub mod java;
pub mod overlay;
pub mod profile;
pub mod services;
pub mod ssh;
pub mod storage;

use crate::core::shell::Shell;
use crate::io::config::ProvisionConfig;
use crate::io::host::HostEnv;
use crate::io::paths::HostPaths;
use crate::io::process::{CommandRunner, CommandSpec};
use crate::io::prompt::Prompter;

/// Answers supplied on the command line instead of interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Answer the confirmation gate with yes.
    pub assume_yes: bool,
    /// Hadoop user; prompts when unset.
    pub user: Option<String>,
    /// Enable the SSH daemon at boot; prompts when unset.
    pub ssh_at_boot: Option<bool>,
}

/// Shared state threaded through the steps of one run.
pub struct StepContext<'a> {
    pub config: &'a ProvisionConfig,
    pub paths: &'a HostPaths,
    pub host: &'a HostEnv,
    pub options: &'a InstallOptions,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    pub shell: Shell,
    /// Variables exported into the session by the profile step.
    pub env: Vec<(String, String)>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        config: &'a ProvisionConfig,
        paths: &'a HostPaths,
        host: &'a HostEnv,
        options: &'a InstallOptions,
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            config,
            paths,
            host,
            options,
            runner,
            prompter,
            shell: Shell::detect(host.shell.as_deref()),
            env: Vec::new(),
        }
    }

    /// A command that needs root, prefixed with `sudo` when configured.
    pub fn privileged(&self, program: &str) -> CommandSpec {
        CommandSpec::new(program).sudo(self.config.exec.use_sudo)
    }
}
