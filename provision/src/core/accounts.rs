//! Parsing of account-database query output.

/// Split `id -nG` output into group names.
pub fn parse_groups(output: &str) -> Vec<String> {
    output.split_whitespace().map(str::to_string).collect()
}

pub fn is_member(groups: &[String], group: &str) -> bool {
    groups.iter().any(|g| g == group)
}
