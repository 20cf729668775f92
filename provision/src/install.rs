//! Orchestration for `hadoop-provision install`.
//!
//! Runs the steps in a fixed order behind the confirmation gate. The first
//! failing step ends the run; the host is left as far as it got.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::types::{Completed, RunOutcome};
use crate::io::config::ProvisionConfig;
use crate::io::host::HostEnv;
use crate::io::paths::HostPaths;
use crate::io::process::CommandRunner;
use crate::io::prompt::Prompter;
use crate::steps::archive::acquire_archive;
use crate::steps::confirm::confirm;
use crate::steps::java::install_java;
use crate::steps::overlay::apply_overlay;
use crate::steps::profile::configure_profile;
use crate::steps::services::{console_urls, start_services};
use crate::steps::ssh::configure_ssh;
use crate::steps::storage::provision_storage;
use crate::steps::{InstallOptions, StepContext};

/// Inputs of one provisioning run.
pub struct InstallRequest<'a> {
    pub config: &'a ProvisionConfig,
    pub host: &'a HostEnv,
    pub options: &'a InstallOptions,
}

/// Provision the host.
///
/// Returns [`RunOutcome::Aborted`] without touching anything when the
/// operator declines. The shell handoff is left to the caller.
pub fn run_install<R: CommandRunner, P: Prompter>(
    request: &InstallRequest<'_>,
    runner: &R,
    prompter: &P,
) -> Result<RunOutcome> {
    let paths = HostPaths::new(request.config, request.host);
    debug!(home = %paths.home.display(), install = %paths.install_dir.display(), "resolved paths");

    let mut ctx = StepContext::new(
        request.config,
        &paths,
        request.host,
        request.options,
        runner,
        prompter,
    );
    info!(shell = ctx.shell.name(), "detected shell");

    if !confirm(&ctx)? {
        info!("operator declined");
        return Ok(RunOutcome::Aborted);
    }

    let mut reports = Vec::new();
    reports.push(install_java(&ctx)?);
    reports.push(acquire_archive(&ctx)?);
    reports.push(configure_profile(&mut ctx)?);
    reports.push(apply_overlay(&ctx)?);
    reports.push(provision_storage(&ctx)?);
    reports.push(configure_ssh(&ctx)?);
    reports.push(start_services(&ctx).context("start Hadoop services")?);

    info!(steps = reports.len(), "provisioning complete");
    Ok(RunOutcome::Completed(Completed {
        reports,
        shell: ctx.shell,
        env: ctx.env,
        console_urls: console_urls(&request.config.hadoop),
    }))
}
