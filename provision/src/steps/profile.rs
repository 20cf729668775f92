//! Shell-profile environment injection.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::StepContext;
use crate::core::profile::{ProfileVars, session_env};
use crate::core::types::{Step, StepReport};
use crate::io::process::{CommandSpec, run_checked};
use crate::io::profile::{ProfileRenderer, ensure_block};

pub fn configure_profile(ctx: &mut StepContext<'_>) -> Result<StepReport> {
    println!("==> Configuring shell environment");
    let vars = ProfileVars {
        hadoop_home: ctx.paths.install_dir.clone(),
        java_home: ctx.config.java.home.clone(),
    };
    // Later steps run the Hadoop scripts, so the session gets the variables
    // even when the profile cannot be written.
    ctx.env = session_env(&vars, ctx.host.path.as_deref());

    let shell = ctx.shell.clone();
    let Some(profile) = shell.profile_path(&ctx.paths.home) else {
        warn!(shell = shell.name(), "unsupported shell");
        println!(
            "[WARN] Unsupported shell '{}': add the Hadoop variables to your shell profile manually",
            shell.name()
        );
        return Ok(StepReport::skipped(
            Step::Profile,
            format!("unsupported shell '{}'", shell.name()),
        ));
    };

    let block = ProfileRenderer::new().render(&shell, &vars)?;
    let written = ensure_block(&profile, &block)?;
    if written {
        info!(profile = %profile.display(), "environment block appended");
    } else {
        println!(
            "[SKIP] Hadoop variables already present in {}",
            profile.display()
        );
    }

    if let Some(args) = shell.source_args(&profile) {
        run_checked(ctx.runner, &CommandSpec::new(shell.name()).args(args))
            .with_context(|| format!("source {}", profile.display()))?;
    }

    if written {
        Ok(StepReport::applied(
            Step::Profile,
            format!("variables added to {}", profile.display()),
        ))
    } else {
        Ok(StepReport::skipped(
            Step::Profile,
            format!("{} already configured", profile.display()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::profile::MARKER;
    use crate::core::types::StepOutcome;
    use crate::steps::InstallOptions;
    use crate::test_support::{ScriptedPrompter, ScriptedRunner, TestHost};

    #[test]
    fn bash_profile_written_once_and_sourced_each_run() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions::default();

        let mut ctx = host.context(&options, &runner, &prompter);
        let first = configure_profile(&mut ctx).expect("first");
        let second = configure_profile(&mut ctx).expect("second");

        assert_eq!(first.outcome, StepOutcome::Applied);
        assert_eq!(second.outcome, StepOutcome::Skipped);
        let bashrc = fs::read_to_string(host.home().join(".bashrc")).expect("read");
        assert_eq!(bashrc.matches(MARKER).count(), 1);
        assert_eq!(
            runner
                .calls()
                .iter()
                .filter(|call| call.starts_with("bash -c source"))
                .count(),
            2
        );
        assert!(ctx.env.iter().any(|(name, _)| name == "HADOOP_HOME"));
    }

    #[test]
    fn fish_profile_lands_in_fish_config() {
        let host = TestHost::new("/usr/bin/fish");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions::default();
        let mut ctx = host.context(&options, &runner, &prompter);

        configure_profile(&mut ctx).expect("profile");
        let config = fs::read_to_string(host.home().join(".config/fish/config.fish"))
            .expect("read fish config");
        assert!(config.contains("set -gx HADOOP_HOME"));
        assert!(runner.ran("fish -c source"));
    }

    #[test]
    fn unsupported_shell_warns_but_exports_session_env() {
        let host = TestHost::new("/bin/tcsh");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions::default();
        let mut ctx = host.context(&options, &runner, &prompter);

        let report = configure_profile(&mut ctx).expect("profile");
        assert_eq!(report.outcome, StepOutcome::Skipped);
        assert!(report.detail.contains("tcsh"));
        assert!(runner.calls().is_empty());
        assert!(!ctx.env.is_empty());
    }

    #[test]
    fn failing_source_is_fatal() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new().fail("bash -c source", 1);
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions::default();
        let mut ctx = host.context(&options, &runner, &prompter);

        let err = configure_profile(&mut ctx).expect_err("source fails");
        assert!(format!("{err:#}").contains(".bashrc"));
    }
}
