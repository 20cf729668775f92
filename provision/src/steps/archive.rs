//! Hadoop archive acquisition and extraction.
//!
//! The archive is taken from the first cache location that holds it, or
//! downloaded into the first cache location. It is unpacked into the extract
//! directory and the versioned directory is renamed to the install path.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use super::StepContext;
use crate::core::types::{Step, StepReport};
use crate::io::fs::file_sha512;
use crate::io::process::{CommandSpec, run_checked};

pub fn acquire_archive(ctx: &StepContext<'_>) -> Result<StepReport> {
    let paths = ctx.paths;
    println!("==> Installing Hadoop {}", ctx.config.hadoop.version);

    if paths.hadoop_installed() {
        println!(
            "[SKIP] Hadoop already installed at {}",
            paths.install_dir.display()
        );
        return Ok(StepReport::skipped(
            Step::Archive,
            format!("already installed at {}", paths.install_dir.display()),
        ));
    }

    let (archive, downloaded) = match paths.cached_archive() {
        Some(cached) => {
            println!("Using cached archive {}", cached.display());
            (cached.to_path_buf(), false)
        }
        None => (download(ctx)?, true),
    };

    if let Some(expected) = &ctx.config.hadoop.archive_sha512 {
        verify_sha512(&archive, expected)?;
    }

    extract(ctx, &archive)?;

    let source = if downloaded { "downloaded" } else { "cached" };
    Ok(StepReport::applied(
        Step::Archive,
        format!(
            "{source} {} extracted to {}",
            archive.display(),
            paths.install_dir.display()
        ),
    ))
}

fn download(ctx: &StepContext<'_>) -> Result<PathBuf> {
    let dest = ctx.paths.archive_caches[0].clone();
    let url = ctx.config.hadoop.archive_url();
    println!("Downloading {url}");
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }

    let spec = CommandSpec::new("wget").args([
        "-O".to_string(),
        dest.display().to_string(),
        url.clone(),
    ]);
    if let Err(err) = run_checked(ctx.runner, &spec) {
        // wget -O leaves a partial file behind, which would later pass as a cache hit.
        if dest.exists() {
            warn!(path = %dest.display(), "removing partial download");
            fs::remove_file(&dest)
                .with_context(|| format!("remove partial download {}", dest.display()))?;
        }
        return Err(err).with_context(|| format!("download {url}"));
    }
    info!(path = %dest.display(), "archive downloaded");
    Ok(dest)
}

fn verify_sha512(archive: &Path, expected: &str) -> Result<()> {
    let actual = file_sha512(archive)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        bail!(
            "checksum mismatch for {}: expected sha512 {}, got {}",
            archive.display(),
            expected.trim(),
            actual
        );
    }
    info!(archive = %archive.display(), "sha512 verified");
    Ok(())
}

fn extract(ctx: &StepContext<'_>, archive: &Path) -> Result<()> {
    let paths = ctx.paths;
    let extract_dir = ctx.config.hadoop.extract_dir.display().to_string();
    println!("Extracting {} into {extract_dir}", archive.display());
    run_checked(
        ctx.runner,
        &ctx.privileged("tar").args([
            "-xzf".to_string(),
            archive.display().to_string(),
            "-C".to_string(),
            extract_dir,
        ]),
    )
    .context("extract Hadoop archive")?;

    run_checked(
        ctx.runner,
        &ctx.privileged("mv").args([
            paths.extracted_dir.display().to_string(),
            paths.install_dir.display().to_string(),
        ]),
    )
    .context("move Hadoop into install directory")?;
    Ok(())
}
