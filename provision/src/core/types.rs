//! Shared types describing what a provisioning run did.

use std::fmt;

use serde::Serialize;

use super::shell::Shell;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Java,
    Archive,
    Profile,
    Overlay,
    Storage,
    Ssh,
    Services,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Java => "java runtime",
            Step::Archive => "hadoop archive",
            Step::Profile => "shell profile",
            Step::Overlay => "configuration overlay",
            Step::Storage => "users and storage",
            Step::Ssh => "ssh",
            Step::Services => "services",
        };
        f.pad(label)
    }
}

/// Whether a step changed the host or found its precondition already met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOutcome {
    Applied,
    Skipped,
}

/// Per-step summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
    pub detail: String,
}

impl StepReport {
    pub fn applied(step: Step, detail: impl Into<String>) -> Self {
        Self {
            step,
            outcome: StepOutcome::Applied,
            detail: detail.into(),
        }
    }

    pub fn skipped(step: Step, detail: impl Into<String>) -> Self {
        Self {
            step,
            outcome: StepOutcome::Skipped,
            detail: detail.into(),
        }
    }
}

/// A completed provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub reports: Vec<StepReport>,
    /// Shell to hand off to.
    pub shell: Shell,
    /// Environment exported into the session by the profile step.
    pub env: Vec<(String, String)>,
    /// Web consoles of the started services, as `(label, url)`.
    pub console_urls: Vec<(String, String)>,
}

/// Result of `hadoop-provision install`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The operator declined the confirmation gate; nothing was touched.
    Aborted,
    Completed(Completed),
}
