//! Confirmation gate in front of every host change.

use anyhow::Result;
use tracing::info;

use super::StepContext;
use crate::core::answer::is_affirmative;

/// True when the operator agreed to proceed.
pub fn confirm(ctx: &StepContext<'_>) -> Result<bool> {
    if ctx.options.assume_yes {
        info!("confirmation answered by --yes");
        return Ok(true);
    }
    let question = format!(
        "This will install {java}, Hadoop {version} into {install} and {ssh}, \
         and configure SSH for localhost. Proceed? [y/N]",
        java = ctx.config.java.package,
        version = ctx.config.hadoop.version,
        install = ctx.paths.install_dir.display(),
        ssh = ctx.config.ssh.package,
    );
    let answer = ctx.prompter.ask(&question)?;
    Ok(is_affirmative(&answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::InstallOptions;
    use crate::test_support::{ScriptedPrompter, ScriptedRunner, TestHost};

    #[test]
    fn yes_answer_proceeds_and_anything_else_declines() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new();
        let options = InstallOptions::default();

        for (answer, expected) in [("y\n", true), ("YES\n", true), ("\n", false), ("nope", false)] {
            let prompter = ScriptedPrompter::new([answer]);
            let ctx = host.context(&options, &runner, &prompter);
            assert_eq!(confirm(&ctx).expect("confirm"), expected, "{answer:?}");
        }
    }

    #[test]
    fn assume_yes_skips_the_prompt() {
        let host = TestHost::new("/bin/bash");
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new(Vec::<&str>::new());
        let options = InstallOptions {
            assume_yes: true,
            ..InstallOptions::default()
        };
        let ctx = host.context(&options, &runner, &prompter);
        assert!(confirm(&ctx).expect("confirm"));
        assert!(prompter.questions().is_empty());
    }
}
