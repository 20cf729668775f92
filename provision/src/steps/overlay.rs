//! Copy of pre-edited configuration files over the stock `etc/hadoop`.

use anyhow::{Context, Result};

use super::StepContext;
use crate::core::types::{Step, StepReport};
use crate::io::process::run_checked;

pub fn apply_overlay(ctx: &StepContext<'_>) -> Result<StepReport> {
    let overlay = &ctx.paths.overlay_dir;
    let conf_dir = &ctx.paths.conf_dir;
    println!("==> Applying configuration overlay");

    if !overlay.is_dir() {
        println!(
            "[SKIP] No configuration overlay at {}; keeping the default configuration",
            overlay.display()
        );
        return Ok(StepReport::skipped(
            Step::Overlay,
            format!("{} not found", overlay.display()),
        ));
    }

    // `dir/.` copies the directory's contents, hidden files included.
    let spec = ctx.privileged("cp").args([
        "-r".to_string(),
        format!("{}/.", overlay.display()),
        conf_dir.display().to_string(),
    ]);
    run_checked(ctx.runner, &spec)
        .with_context(|| format!("copy configuration overlay into {}", conf_dir.display()))?;

    Ok(StepReport::applied(
        Step::Overlay,
        format!("{} copied into {}", overlay.display(), conf_dir.display()),
    ))
}
