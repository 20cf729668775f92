//! HDFS format and service start.

use anyhow::{Context, Result};
use tracing::info;

use super::StepContext;
use crate::core::types::{Step, StepReport};
use crate::io::config::HadoopConfig;
use crate::io::process::{CommandSpec, run_checked};

/// Web consoles exposed by the started daemons, as `(label, url)`.
pub fn console_urls(hadoop: &HadoopConfig) -> Vec<(String, String)> {
    vec![
        (
            "NameNode".to_string(),
            format!("http://localhost:{}", hadoop.namenode_http_port),
        ),
        (
            "ResourceManager".to_string(),
            format!("http://localhost:{}", hadoop.resourcemanager_http_port),
        ),
    ]
}

pub fn start_services(ctx: &StepContext<'_>) -> Result<StepReport> {
    let install = &ctx.paths.install_dir;
    println!("==> Formatting HDFS and starting Hadoop");

    let hdfs = install.join("bin").join("hdfs");
    run_checked(
        ctx.runner,
        &CommandSpec::new(hdfs.display().to_string())
            .args(["namenode", "-format"])
            .envs(&ctx.env),
    )
    .context("format HDFS namenode")?;

    for script in ["start-dfs.sh", "start-yarn.sh"] {
        let path = install.join("sbin").join(script);
        run_checked(
            ctx.runner,
            &CommandSpec::new(path.display().to_string()).envs(&ctx.env),
        )
        .with_context(|| format!("run {script}"))?;
        info!(script, "service group started");
    }

    Ok(StepReport::applied(
        Step::Services,
        "HDFS formatted, HDFS and YARN started",
    ))
}
