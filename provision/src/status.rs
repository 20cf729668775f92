//! Read-only report of what is already provisioned on this host.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::authorized_keys::contains_key;
use crate::core::profile::has_marker;
use crate::core::shell::Shell;
use crate::io::config::ProvisionConfig;
use crate::io::fs::read_or_empty;
use crate::io::host::HostEnv;
use crate::io::paths::HostPaths;

/// A single precondition and whether it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusItem {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostStatus {
    pub hadoop_version: String,
    pub shell: Shell,
    pub items: Vec<StatusItem>,
}

impl HostStatus {
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|item| item.ok)
    }

    pub fn print(&self) {
        println!("Hadoop {} provisioning status", self.hadoop_version);
        println!("==============================");
        for item in &self.items {
            let mark = if item.ok { "[OK]     " } else { "[MISSING]" };
            println!("{mark} {:<18} {}", item.name, item.detail);
        }
        println!();
        if self.is_complete() {
            println!("Host is fully provisioned.");
        } else {
            println!("Run 'hadoop-provision install' to provision the missing pieces.");
        }
    }
}

pub fn collect_status(config: &ProvisionConfig, host: &HostEnv) -> Result<HostStatus> {
    let paths = HostPaths::new(config, host);
    let shell = Shell::detect(host.shell.as_deref());
    let mut items = Vec::new();

    let java = config.java.home.clone();
    items.push(path_item("java", java.is_dir(), java));

    let archive = paths.cached_archive().map(PathBuf::from);
    items.push(StatusItem {
        name: "archive cache",
        ok: archive.is_some(),
        detail: match &archive {
            Some(path) => path.display().to_string(),
            None => format!("none of {}", join_paths(&paths.archive_caches)),
        },
    });

    items.push(path_item(
        "hadoop install",
        paths.hadoop_installed(),
        paths.install_dir.clone(),
    ));

    items.push(match shell.profile_path(&paths.home) {
        Some(profile) => {
            let configured = has_marker(&read_or_empty(&profile)?);
            path_item("shell profile", configured, profile)
        }
        None => StatusItem {
            name: "shell profile",
            ok: false,
            detail: format!("unsupported shell '{}'", shell.name()),
        },
    });

    items.push(path_item(
        "config overlay",
        paths.overlay_dir.is_dir(),
        paths.overlay_dir.clone(),
    ));

    for (name, dir) in [
        ("namenode dir", &paths.namenode_dir),
        ("datanode dir", &paths.datanode_dir),
        ("log dir", &paths.log_dir),
    ] {
        items.push(path_item(name, dir.is_dir(), dir.clone()));
    }

    items.push(path_item(
        "ssh key",
        paths.private_key.is_file(),
        paths.private_key.clone(),
    ));

    let public_key = read_or_empty(&paths.public_key)?;
    let authorized = !public_key.trim().is_empty()
        && contains_key(&read_or_empty(&paths.authorized_keys)?, &public_key);
    items.push(path_item(
        "authorized key",
        authorized,
        paths.authorized_keys.clone(),
    ));

    Ok(HostStatus {
        hadoop_version: config.hadoop.version.clone(),
        shell,
        items,
    })
}

fn path_item(name: &'static str, ok: bool, path: PathBuf) -> StatusItem {
    StatusItem {
        name,
        ok,
        detail: path.display().to_string(),
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHost;

    fn item<'a>(status: &'a HostStatus, name: &str) -> &'a StatusItem {
        status
            .items
            .iter()
            .find(|item| item.name == name)
            .unwrap_or_else(|| panic!("missing item {name}"))
    }

    #[test]
    fn fresh_host_reports_everything_missing() {
        let host = TestHost::new("/bin/bash");
        let status = collect_status(host.config(), host.env()).expect("status");
        assert!(!status.is_complete());
        assert!(!item(&status, "hadoop install").ok);
        assert!(!item(&status, "shell profile").ok);
        assert!(!item(&status, "authorized key").ok);
        assert!(item(&status, "archive cache").detail.starts_with("none of "));
    }

    #[test]
    fn provisioned_pieces_are_reported() {
        let host = TestHost::new("/bin/bash");
        host.seed_install();
        host.seed_archive(1, b"tar");
        host.seed_ssh_key("ssh-rsa AAAAkey alice@host\n");
        std::fs::write(&host.paths().authorized_keys, "ssh-rsa AAAAkey alice@host\n")
            .expect("authorized_keys");
        std::fs::write(
            host.home().join(".bashrc"),
            format!("{}\n", crate::core::profile::MARKER),
        )
        .expect("bashrc");

        let status = collect_status(host.config(), host.env()).expect("status");
        assert!(item(&status, "hadoop install").ok);
        assert!(item(&status, "archive cache").ok);
        assert!(item(&status, "shell profile").ok);
        assert!(item(&status, "ssh key").ok);
        assert!(item(&status, "authorized key").ok);
    }

    #[test]
    fn unsupported_shell_profile_is_missing() {
        let host = TestHost::new("/bin/ksh");
        let status = collect_status(host.config(), host.env()).expect("status");
        let profile = item(&status, "shell profile");
        assert!(!profile.ok);
        assert!(profile.detail.contains("ksh"));
    }

    #[test]
    fn serializes_to_json() {
        let host = TestHost::new("/bin/bash");
        let status = collect_status(host.config(), host.env()).expect("status");
        let json = serde_json::to_value(&status).expect("json");
        assert_eq!(json["shell"], "bash");
        assert_eq!(json["hadoop_version"], "3.3.6");
        assert!(json["items"].as_array().expect("items").len() >= 10);
    }
}
