//! Provisioner configuration stored in `hadoop-provision.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hadoop-provision.toml";

/// Provisioner configuration (TOML).
///
/// Every field has a default, so an absent file or a partial file is valid.
/// The defaults describe a stock single-node Hadoop 3 install on Ubuntu.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Home directory to provision; `$HOME` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,

    pub hadoop: HadoopConfig,
    pub java: JavaConfig,
    pub ssh: SshConfig,
    pub storage: StorageConfig,
    pub exec: ExecConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HadoopConfig {
    pub version: String,
    /// Download URL; `{version}` is substituted.
    pub mirror_url: String,
    /// Expected SHA-512 of the archive (hex). Unchecked when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_sha512: Option<String>,
    /// Directory the archive is extracted into.
    pub extract_dir: PathBuf,
    /// Canonical install path the extracted directory is renamed to.
    pub install_dir: PathBuf,
    /// Pre-edited configuration files copied over `etc/hadoop`.
    pub overlay_dir: PathBuf,
    pub namenode_http_port: u16,
    pub resourcemanager_http_port: u16,
}

impl Default for HadoopConfig {
    fn default() -> Self {
        Self {
            version: "3.3.6".to_string(),
            mirror_url:
                "https://dlcdn.apache.org/hadoop/common/hadoop-{version}/hadoop-{version}.tar.gz"
                    .to_string(),
            archive_sha512: None,
            extract_dir: PathBuf::from("/usr/local"),
            install_dir: PathBuf::from("/usr/local/hadoop"),
            overlay_dir: PathBuf::from("hadoop-config"),
            namenode_http_port: 9870,
            resourcemanager_http_port: 8088,
        }
    }
}

impl HadoopConfig {
    pub fn archive_name(&self) -> String {
        format!("hadoop-{}.tar.gz", self.version)
    }

    pub fn archive_url(&self) -> String {
        self.mirror_url.replace("{version}", &self.version)
    }

    /// Directory name the archive unpacks to.
    pub fn extracted_dir(&self) -> PathBuf {
        self.extract_dir.join(format!("hadoop-{}", self.version))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JavaConfig {
    pub package: String,
    pub home: PathBuf,
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            package: "openjdk-11-jdk".to_string(),
            home: PathBuf::from("/usr/lib/jvm/java-11-openjdk-amd64"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SshConfig {
    pub package: String,
    /// systemd unit name of the SSH daemon.
    pub service: String,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            package: "openssh-server".to_string(),
            service: "ssh".to_string(),
        }
    }
}

/// Storage locations; relative paths are resolved against `hadoop.install_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub namenode_dir: PathBuf,
    pub datanode_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namenode_dir: PathBuf::from("data/namenode"),
            datanode_dir: PathBuf::from("data/datanode"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecConfig {
    /// Prefix privileged commands with `sudo`.
    pub use_sudo: bool,
    /// Per-command wall-clock limit in seconds; 0 disables it.
    pub command_timeout_secs: u64,
    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            use_sudo: true,
            command_timeout_secs: 0,
            output_limit_bytes: 100_000,
        }
    }
}

impl ExecConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }
}

impl ProvisionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hadoop.version.trim().is_empty() {
            return Err(anyhow!("hadoop.version must not be empty"));
        }
        if self.hadoop.mirror_url.trim().is_empty() {
            return Err(anyhow!("hadoop.mirror_url must not be empty"));
        }
        if !self.hadoop.extract_dir.is_absolute() {
            return Err(anyhow!("hadoop.extract_dir must be an absolute path"));
        }
        if !self.hadoop.install_dir.is_absolute() {
            return Err(anyhow!("hadoop.install_dir must be an absolute path"));
        }
        if self.hadoop.namenode_http_port == 0 || self.hadoop.resourcemanager_http_port == 0 {
            return Err(anyhow!("hadoop console ports must be > 0"));
        }
        if let Some(digest) = &self.hadoop.archive_sha512
            && (digest.len() != 128 || !digest.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(anyhow!(
                "hadoop.archive_sha512 must be 128 hexadecimal characters"
            ));
        }
        if self.java.package.trim().is_empty() {
            return Err(anyhow!("java.package must not be empty"));
        }
        if self.ssh.package.trim().is_empty() || self.ssh.service.trim().is_empty() {
            return Err(anyhow!("ssh.package and ssh.service must not be empty"));
        }
        if self.exec.output_limit_bytes == 0 {
            return Err(anyhow!("exec.output_limit_bytes must be > 0"));
        }
        if let Some(home) = &self.home_dir
            && !home.is_absolute()
        {
            return Err(anyhow!("home_dir must be an absolute path"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ProvisionConfig::default()`.
pub fn load_config(path: &Path) -> Result<ProvisionConfig> {
    if !path.exists() {
        let cfg = ProvisionConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ProvisionConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ProvisionConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = render_config(cfg)?;
    buf.push('\n');
    write_atomic(path, &buf)
}

pub fn render_config(cfg: &ProvisionConfig) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config toml")
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
