//! Environment exported for the Hadoop installation.
//!
//! The same variable set is written to the shell profile and applied to the
//! provisioner's own child processes once the profile step has run.

use std::path::PathBuf;

/// Comment line that marks an already-configured profile.
pub const MARKER: &str = "# Hadoop Related Options";

/// Install locations the exported variables point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileVars {
    pub hadoop_home: PathBuf,
    pub java_home: PathBuf,
}

/// Names exported by the profile block, in block order.
pub const EXPORTED_NAMES: [&str; 11] = [
    "JAVA_HOME",
    "HADOOP_HOME",
    "HADOOP_INSTALL",
    "HADOOP_MAPRED_HOME",
    "HADOOP_COMMON_HOME",
    "HADOOP_HDFS_HOME",
    "YARN_HOME",
    "HADOOP_COMMON_LIB_NATIVE_DIR",
    "PATH",
    "HADOOP_OPTS",
    // Read by the start scripts when launched outside a login shell.
    "HADOOP_CONF_DIR",
];

/// True if the marker appears anywhere in the profile, hand-edited lines included.
pub fn has_marker(contents: &str) -> bool {
    contents.contains(MARKER)
}

/// Fully expanded variables for child processes of this run.
///
/// `current_path` is the provisioner's own `PATH`; Hadoop's `sbin` and `bin`
/// are appended to it.
pub fn session_env(vars: &ProfileVars, current_path: Option<&str>) -> Vec<(String, String)> {
    let home = vars.hadoop_home.to_string_lossy().into_owned();
    let native = format!("{home}/lib/native");
    let mut path = current_path.unwrap_or_default().to_string();
    for dir in [format!("{home}/sbin"), format!("{home}/bin")] {
        if !path.is_empty() {
            path.push(':');
        }
        path.push_str(&dir);
    }

    let values = [
        vars.java_home.to_string_lossy().into_owned(),
        home.clone(),
        home.clone(),
        home.clone(),
        home.clone(),
        home.clone(),
        home.clone(),
        native.clone(),
        path,
        format!("-Djava.library.path={native}"),
        format!("{home}/etc/hadoop"),
    ];
    EXPORTED_NAMES
        .iter()
        .zip(values)
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
