//! Canonical host paths for a provisioning run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::config::ProvisionConfig;
use super::host::HostEnv;

/// All paths the pipeline reads or writes, resolved once from config and
/// the process environment.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HostPaths {
    pub home: PathBuf,
    /// Locations checked for a previously downloaded archive, in order.
    /// Downloads land in the first one.
    pub archive_caches: Vec<PathBuf>,
    pub extracted_dir: PathBuf,
    pub install_dir: PathBuf,
    pub conf_dir: PathBuf,
    pub overlay_dir: PathBuf,
    pub namenode_dir: PathBuf,
    pub datanode_dir: PathBuf,
    pub log_dir: PathBuf,
    pub ssh_dir: PathBuf,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub authorized_keys: PathBuf,
}

impl HostPaths {
    pub fn new(config: &ProvisionConfig, host: &HostEnv) -> Self {
        let home = config.home_dir.clone().unwrap_or_else(|| host.home.clone());
        let archive = config.hadoop.archive_name();
        let install_dir = config.hadoop.install_dir.clone();
        let ssh_dir = home.join(".ssh");
        Self {
            archive_caches: vec![home.join(&archive), home.join("Downloads").join(&archive)],
            extracted_dir: config.hadoop.extracted_dir(),
            conf_dir: install_dir.join("etc").join("hadoop"),
            overlay_dir: resolve(&host.cwd, &config.hadoop.overlay_dir),
            namenode_dir: resolve(&install_dir, &config.storage.namenode_dir),
            datanode_dir: resolve(&install_dir, &config.storage.datanode_dir),
            log_dir: resolve(&install_dir, &config.storage.log_dir),
            private_key: ssh_dir.join("id_rsa"),
            public_key: ssh_dir.join("id_rsa.pub"),
            authorized_keys: ssh_dir.join("authorized_keys"),
            ssh_dir,
            install_dir,
            home,
        }
    }

    /// An install is present once the launcher script exists.
    pub fn hadoop_installed(&self) -> bool {
        self.install_dir.join("bin").join("hadoop").is_file()
    }

    pub fn cached_archive(&self) -> Option<&Path> {
        self.archive_caches
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.is_file())
    }

    pub fn storage_dirs(&self) -> [&Path; 3] {
        [&self.namenode_dir, &self.datanode_dir, &self.log_dir]
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostEnv {
        HostEnv {
            home: PathBuf::from("/home/alice"),
            shell: None,
            user: None,
            path: None,
            cwd: PathBuf::from("/srv/setup"),
        }
    }

    #[test]
    fn defaults_resolve_under_install_dir_and_home() {
        let paths = HostPaths::new(&ProvisionConfig::default(), &host());
        assert_eq!(
            paths.archive_caches,
            vec![
                PathBuf::from("/home/alice/hadoop-3.3.6.tar.gz"),
                PathBuf::from("/home/alice/Downloads/hadoop-3.3.6.tar.gz"),
            ]
        );
        assert_eq!(paths.conf_dir, PathBuf::from("/usr/local/hadoop/etc/hadoop"));
        assert_eq!(paths.namenode_dir, PathBuf::from("/usr/local/hadoop/data/namenode"));
        assert_eq!(paths.log_dir, PathBuf::from("/usr/local/hadoop/logs"));
        assert_eq!(paths.overlay_dir, PathBuf::from("/srv/setup/hadoop-config"));
        assert_eq!(paths.authorized_keys, PathBuf::from("/home/alice/.ssh/authorized_keys"));
    }

    #[test]
    fn config_home_overrides_environment() {
        let mut cfg = ProvisionConfig::default();
        cfg.home_dir = Some(PathBuf::from("/home/hdoop"));
        cfg.storage.log_dir = PathBuf::from("/var/log/hadoop");
        let paths = HostPaths::new(&cfg, &host());
        assert_eq!(paths.private_key, PathBuf::from("/home/hdoop/.ssh/id_rsa"));
        assert_eq!(paths.log_dir, PathBuf::from("/var/log/hadoop"));
    }

    #[test]
    fn cached_archive_prefers_home_over_downloads() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut env = host();
        env.home = temp.path().to_path_buf();
        let paths = HostPaths::new(&ProvisionConfig::default(), &env);
        assert_eq!(paths.cached_archive(), None);

        std::fs::create_dir_all(temp.path().join("Downloads")).expect("mkdir");
        std::fs::write(&paths.archive_caches[1], b"tar").expect("write");
        assert_eq!(paths.cached_archive(), Some(paths.archive_caches[1].as_path()));

        std::fs::write(&paths.archive_caches[0], b"tar").expect("write");
        assert_eq!(paths.cached_archive(), Some(paths.archive_caches[0].as_path()));
    }
}
