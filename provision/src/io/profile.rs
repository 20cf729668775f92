//! Shell-profile block rendering and injection.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use minijinja::{Environment, context};
use tracing::debug;

use super::fs::{append, read_or_empty};
use crate::core::profile::{MARKER, ProfileVars, has_marker};
use crate::core::shell::Shell;

const BASH_TEMPLATE: &str = include_str!("templates/profile.bash.j2");
const FISH_TEMPLATE: &str = include_str!("templates/profile.fish.j2");

/// Template engine wrapper around minijinja.
pub struct ProfileRenderer {
    env: Environment<'static>,
}

impl Default for ProfileRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("profile.bash", BASH_TEMPLATE)
            .expect("bash profile template should be valid");
        env.add_template("profile.fish", FISH_TEMPLATE)
            .expect("fish profile template should be valid");
        Self { env }
    }

    /// Render the environment block in `shell`'s syntax.
    pub fn render(&self, shell: &Shell, vars: &ProfileVars) -> Result<String> {
        let name = match shell {
            Shell::Bash => "profile.bash",
            Shell::Fish => "profile.fish",
            Shell::Unsupported(name) => {
                return Err(anyhow!("no profile syntax for shell '{name}'"));
            }
        };
        let template = self.env.get_template(name)?;
        let mut rendered = template.render(context! {
            marker => MARKER,
            hadoop_home => vars.hadoop_home.display().to_string(),
            java_home => vars.java_home.display().to_string(),
        })?;
        rendered.push('\n');
        Ok(rendered)
    }
}

/// Append `block` to `profile` unless the marker is already present.
///
/// Returns `true` when the block was written.
pub fn ensure_block(profile: &Path, block: &str) -> Result<bool> {
    let existing = read_or_empty(profile)?;
    if has_marker(&existing) {
        debug!(profile = %profile.display(), "profile already configured");
        return Ok(false);
    }
    let mut text = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(block);
    append(profile, &text).with_context(|| format!("write profile {}", profile.display()))?;
    Ok(true)
}
