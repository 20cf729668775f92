//! Interactive shell detection and per-shell profile conventions.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// The user's interactive shell, as named by `$SHELL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Fish,
    /// Any other shell; the profile must be configured by hand.
    Unsupported(String),
}

impl Shell {
    /// Detect from the value of `$SHELL` (a path such as `/usr/bin/fish`).
    pub fn detect(shell_var: Option<&str>) -> Self {
        let name = shell_var
            .map(str::trim)
            .and_then(|value| Path::new(value).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.as_str() {
            "bash" => Shell::Bash,
            "fish" => Shell::Fish,
            _ => Shell::Unsupported(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Shell::Bash => "bash",
            Shell::Fish => "fish",
            Shell::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Shell::Unsupported(_))
    }

    /// Startup file the environment block is written to.
    pub fn profile_path(&self, home: &Path) -> Option<PathBuf> {
        match self {
            Shell::Bash => Some(home.join(".bashrc")),
            Shell::Fish => Some(home.join(".config").join("fish").join("config.fish")),
            Shell::Unsupported(_) => None,
        }
    }

    /// Arguments that make the shell source `profile` and exit.
    pub fn source_args(&self, profile: &Path) -> Option<Vec<String>> {
        if !self.is_supported() {
            return None;
        }
        let script = format!("source {}", quote(&profile.to_string_lossy()));
        Some(vec!["-c".to_string(), script])
    }
}

/// Single-quote `value`; valid in both bash and fish.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
