//! Java runtime installation through apt.

use anyhow::{Context, Result};
use tracing::info;

use super::StepContext;
use crate::core::types::{Step, StepReport};
use crate::io::process::{CommandSpec, run_checked};

pub fn install_java(ctx: &StepContext<'_>) -> Result<StepReport> {
    let package = &ctx.config.java.package;
    println!("==> Installing Java runtime ({package})");
    for spec in java_commands(ctx) {
        info!(command = %spec.display(), "package manager");
        run_checked(ctx.runner, &spec).context("install Java runtime")?;
    }
    Ok(StepReport::applied(Step::Java, format!("{package} installed")))
}

fn java_commands(ctx: &StepContext<'_>) -> Vec<CommandSpec> {
    vec![
        ctx.privileged("dpkg").args(["--configure", "-a"]),
        ctx.privileged("apt-get").arg("update"),
        ctx.privileged("apt-get")
            .args(["install", "-y", ctx.config.java.package.as_str()]),
    ]
}
