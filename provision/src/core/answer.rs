//! Interpretation of interactive answers.

use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

static AFFIRMATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^y(es)?$").expect("affirmative pattern should be valid"));

static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._][A-Za-z0-9._-]{0,31}\$?$").expect("username pattern should be valid")
});

/// True for `y` / `yes` in any case; everything else (including EOF) declines.
pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE.is_match(answer.trim())
}

/// An empty answer keeps the default.
pub fn username_or_default(answer: &str, default: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Reject names that cannot be a login: empty, whitespace, shell metacharacters
/// or a leading `-`.
pub fn validate_username(name: &str) -> Result<()> {
    if !USERNAME.is_match(name) {
        bail!("invalid username '{name}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_accepts_y_and_yes_in_any_case() {
        for answer in ["y", "Y", "yes", "YES", " Yes\n"] {
            assert!(is_affirmative(answer), "{answer:?} should be affirmative");
        }
    }

    #[test]
    fn affirmative_rejects_everything_else() {
        for answer in ["", "n", "no", "yep", "y es", "sure"] {
            assert!(!is_affirmative(answer), "{answer:?} should decline");
        }
    }

    #[test]
    fn empty_username_answer_keeps_default() {
        assert_eq!(username_or_default("  \n", "alice"), "alice");
        assert_eq!(username_or_default("hdoop\n", "alice"), "hdoop");
    }

    #[test]
    fn username_validation() {
        for name in ["hdoop", "_svc-1", "john.doe", "Alice", "host$"] {
            assert!(validate_username(name).is_ok(), "{name:?} should be valid");
        }
        for name in ["", "a b", "-opt", "x;rm", "a$b"] {
            assert!(validate_username(name).is_err(), "{name:?} should be rejected");
        }
    }
}
