//! Hadoop user, group and storage directory provisioning.

use anyhow::{Context, Result};
use tracing::info;

use super::StepContext;
use crate::core::answer::{username_or_default, validate_username};
use crate::core::types::{Step, StepReport};
use crate::io::host::{group_exists, invoking_user, user_in_group};
use crate::io::process::run_checked;

pub fn provision_storage(ctx: &StepContext<'_>) -> Result<StepReport> {
    println!("==> Provisioning Hadoop user and storage");
    let user = hadoop_user(ctx)?;
    let paths = ctx.paths;

    run_checked(
        ctx.runner,
        &ctx.privileged("mkdir").args([
            "-p".to_string(),
            paths.namenode_dir.display().to_string(),
            paths.datanode_dir.display().to_string(),
        ]),
    )
    .context("create HDFS data directories")?;

    // The group is named after the user.
    let group = user.as_str();
    if group_exists(ctx.runner, group)? {
        println!("[SKIP] Group '{group}' already exists");
    } else {
        run_checked(ctx.runner, &ctx.privileged("groupadd").arg(group))
            .with_context(|| format!("create group {group}"))?;
        info!(group, "group created");
    }

    if user_in_group(ctx.runner, &user, group)? {
        println!("[SKIP] User '{user}' is already in group '{group}'");
    } else {
        run_checked(
            ctx.runner,
            &ctx.privileged("usermod").args(["-aG", group, user.as_str()]),
        )
        .with_context(|| format!("add {user} to group {group}"))?;
        info!(user = %user, group, "user added to group");
    }

    if !paths.log_dir.exists() {
        run_checked(
            ctx.runner,
            &ctx.privileged("mkdir")
                .args(["-p".to_string(), paths.log_dir.display().to_string()]),
        )
        .context("create Hadoop log directory")?;
    }

    let targets: Vec<String> = paths
        .storage_dirs()
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();

    run_checked(
        ctx.runner,
        &ctx.privileged("chown")
            .args(["-R".to_string(), format!("{user}:{group}")])
            .args(targets.iter().cloned()),
    )
    .context("set ownership of Hadoop storage")?;

    run_checked(
        ctx.runner,
        &ctx.privileged("chmod")
            .args(["-R", "755"])
            .args(targets.iter().cloned()),
    )
    .context("set permissions of Hadoop storage")?;

    Ok(StepReport::applied(
        Step::Storage,
        format!("storage owned by {user}:{group}"),
    ))
}

/// `--user`, else the prompt answer, else the invoking user. The invoking user
/// is taken as-is; only a name supplied by the operator is validated.
fn hadoop_user(ctx: &StepContext<'_>) -> Result<String> {
    let default = invoking_user(ctx.runner, ctx.host)?;
    let answer = match &ctx.options.user {
        Some(user) => user.clone(),
        None => ctx
            .prompter
            .ask(&format!("Hadoop user name [{default}]:"))?,
    };
    let user = username_or_default(&answer, &default);
    if user != default {
        validate_username(&user)?;
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::InstallOptions;
    use crate::test_support::{ScriptedPrompter, ScriptedRunner, TestHost};

    #[test]
    fn fresh_host_creates_group_membership_and_directories() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new()
            .respond("getent group alice", 2, "")
            .respond("id -nG alice", 0, "users\n");
        let prompter = ScriptedPrompter::new(["\n"]);
        let options = InstallOptions::default();
        let ctx = host.context(&options, &runner, &prompter);

        let report = provision_storage(&ctx).expect("storage");
        assert_eq!(report.detail, "storage owned by alice:alice");

        let paths = host.paths();
        let dirs = format!(
            "{} {} {}",
            paths.namenode_dir.display(),
            paths.datanode_dir.display(),
            paths.log_dir.display()
        );
        assert_eq!(
            runner.calls(),
            vec![
                format!(
                    "mkdir -p {} {}",
                    paths.namenode_dir.display(),
                    paths.datanode_dir.display()
                ),
                "getent group alice".to_string(),
                "groupadd alice".to_string(),
                "id -nG alice".to_string(),
                "usermod -aG alice alice".to_string(),
                format!("mkdir -p {}", paths.log_dir.display()),
                format!("chown -R alice:alice {dirs}"),
                format!("chmod -R 755 {dirs}"),
            ]
        );
        assert_eq!(prompter.questions(), vec!["Hadoop user name [alice]:"]);
    }

    #[test]
    fn existing_group_and_membership_are_not_recreated() {
        let host = TestHost::new("/bin/bash");
        host.seed_log_dir();
        let runner = ScriptedRunner::new()
            .respond("getent group hdoop", 0, "hdoop:x:1001:\n")
            .respond("id -nG hdoop", 0, "hdoop sudo\n");
        let prompter = ScriptedPrompter::new(["hdoop\n"]);
        let options = InstallOptions::default();
        let ctx = host.context(&options, &runner, &prompter);

        provision_storage(&ctx).expect("storage");
        assert!(!runner.ran("groupadd"));
        assert!(!runner.ran("usermod"));
        assert!(!runner.ran(&format!("mkdir -p {}", host.paths().log_dir.display())));
        assert!(runner.ran("chown -R hdoop:hdoop"));
    }

    #[test]
    fn user_option_skips_prompt_and_is_validated() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions {
            user: Some("Not Valid".to_string()),
            ..InstallOptions::default()
        };
        let ctx = host.context(&options, &runner, &prompter);

        let err = provision_storage(&ctx).expect_err("invalid user");
        assert!(err.to_string().contains("invalid username"));
        assert!(prompter.questions().is_empty());
        assert!(!runner.ran("mkdir"));
    }

    #[test]
    fn dotted_username_is_accepted() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new().respond("id -nG john.doe", 0, "john.doe\n");
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions {
            user: Some("john.doe".to_string()),
            ..InstallOptions::default()
        };
        let ctx = host.context(&options, &runner, &prompter);

        let report = provision_storage(&ctx).expect("storage");
        assert_eq!(report.detail, "storage owned by john.doe:john.doe");
        assert!(runner.ran("getent group john.doe"));
        assert!(runner.ran("chown -R john.doe:john.doe"));
    }

    #[test]
    fn invoking_user_is_taken_without_validation() {
        let mut host = TestHost::new("/bin/bash");
        // SSSD-style login that an operator could not type at the prompt.
        host.set_user("jane.doe@corp");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(["\n"]);
        let options = InstallOptions::default();
        let ctx = host.context(&options, &runner, &prompter);

        let report = provision_storage(&ctx).expect("default user");
        assert_eq!(report.detail, "storage owned by jane.doe@corp:jane.doe@corp");
        assert_eq!(prompter.questions(), vec!["Hadoop user name [jane.doe@corp]:"]);
    }

    #[test]
    fn typed_username_is_validated() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(["jane doe\n"]);
        let options = InstallOptions::default();
        let ctx = host.context(&options, &runner, &prompter);

        let err = provision_storage(&ctx).expect_err("space in name");
        assert!(err.to_string().contains("invalid username 'jane doe'"));
        assert!(!runner.ran("mkdir"));
    }

    #[test]
    fn chown_failure_is_fatal() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new().fail("chown", 1);
        let prompter = ScriptedPrompter::new(["\n"]);
        let options = InstallOptions::default();
        let ctx = host.context(&options, &runner, &prompter);

        let err = provision_storage(&ctx).expect_err("chown fails");
        assert!(format!("{err:#}").contains("set ownership of Hadoop storage"));
        assert!(!runner.ran("chmod"));
    }
}
