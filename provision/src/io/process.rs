//! External command execution.
//!
//! Every system tool the provisioner touches goes through [`CommandRunner`],
//! so steps can be driven by a scripted runner in tests.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use super::config::ExecConfig;

/// A command line plus how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Run through `sudo`.
    pub sudo: bool,
    /// Extra environment for the child.
    pub env: Vec<(String, String)>,
    /// Capture stdout/stderr instead of inheriting the terminal.
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            sudo: false,
            env: Vec::new(),
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn sudo(mut self, enabled: bool) -> Self {
        self.sudo = enabled;
        self
    }

    pub fn envs(mut self, env: &[(String, String)]) -> Self {
        self.env.extend(env.iter().cloned());
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Command line as the operator would type it.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        if self.sudo {
            parts.push("sudo");
        }
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = if self.sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        };
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }
}

/// Result of a finished child process.
///
/// `stdout`/`stderr` are empty for commands that inherit the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0) && !self.timed_out
    }
}

pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Run `spec` and turn any unsuccessful exit into an error naming the command.
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandOutput> {
    let output = runner.run(spec)?;
    if output.success() {
        return Ok(output);
    }
    let status = if output.timed_out {
        "timed out".to_string()
    } else {
        match output.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    };
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        Err(anyhow!("{} failed ({status})", spec.display()))
    } else {
        Err(anyhow!("{} failed ({status}): {stderr}", spec.display()))
    }
}

/// Runs commands on the local host.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>, output_limit_bytes: usize) -> Self {
        Self {
            timeout,
            output_limit_bytes,
        }
    }

    pub fn from_config(exec: &ExecConfig) -> Self {
        Self::new(exec.command_timeout(), exec.output_limit_bytes)
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %spec.display(), capture = spec.capture))]
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut cmd = spec.to_command();
        if spec.capture {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        debug!("spawning child process");
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| format!("spawn {}", spec.display()));
            }
        };

        if !spec.capture {
            let (status, timed_out) = wait_for(&mut child, self.timeout)?;
            debug!(exit_code = ?status.code(), timed_out, "command finished");
            return Ok(CommandOutput {
                code: status.code(),
                timed_out,
                ..CommandOutput::default()
            });
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("stderr was not piped"))?;

        let limit = self.output_limit_bytes;
        let stdout_handle = thread::spawn(move || read_stream_limited(stdout, limit));
        let stderr_handle = thread::spawn(move || read_stream_limited(stderr, limit));

        let (status, timed_out) = wait_for(&mut child, self.timeout)?;

        let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
        let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;

        if stdout_truncated > 0 || stderr_truncated > 0 {
            warn!(stdout_truncated, stderr_truncated, "output truncated");
        }

        debug!(exit_code = ?status.code(), timed_out, "command finished");
        Ok(CommandOutput {
            code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            timed_out,
        })
    }
}

fn wait_for(child: &mut Child, timeout: Option<Duration>) -> Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        return Ok((child.wait().context("wait for command")?, false));
    };
    match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => Ok((status, false)),
        None => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "command timed out, killing"
            );
            child.kill().context("kill command")?;
            let status = child.wait().context("wait command after kill")?;
            Ok((status, true))
        }
    }
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_sudo_prefix() {
        let spec = CommandSpec::new("apt-get")
            .args(["install", "-y", "openjdk-11-jdk"])
            .sudo(true);
        assert_eq!(spec.display(), "sudo apt-get install -y openjdk-11-jdk");
        assert_eq!(CommandSpec::new("id").arg("-un").display(), "id -un");
    }

    #[test]
    fn system_runner_captures_output_and_exit_code() {
        let runner = SystemRunner::new(None, 1024);
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .captured();
        let output = runner.run(&spec).expect("run");
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.success());
    }

    #[test]
    fn system_runner_passes_environment() {
        let runner = SystemRunner::new(None, 1024);
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf %s \"$HADOOP_HOME\""])
            .envs(&[("HADOOP_HOME".to_string(), "/opt/hadoop".to_string())])
            .captured();
        let output = runner.run(&spec).expect("run");
        assert_eq!(output.stdout, "/opt/hadoop");
    }

    #[test]
    fn system_runner_truncates_captured_output() {
        let runner = SystemRunner::new(None, 4);
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf 0123456789"])
            .captured();
        let output = runner.run(&spec).expect("run");
        assert_eq!(output.stdout, "0123");
    }

    #[test]
    fn system_runner_kills_on_timeout() {
        let runner = SystemRunner::new(Some(Duration::from_millis(200)), 1024);
        let spec = CommandSpec::new("sleep").arg("5").captured();
        let output = runner.run(&spec).expect("run");
        assert!(output.timed_out);
        assert!(!output.success());
    }

    #[test]
    fn run_checked_reports_command_and_stderr() {
        let runner = SystemRunner::new(None, 1024);
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo boom >&2; exit 2"])
            .captured();
        let err = run_checked(&runner, &spec).expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("exit status 2"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }

    #[test]
    fn spawn_failure_names_the_program() {
        let runner = SystemRunner::new(None, 1024);
        let spec = CommandSpec::new("definitely_not_a_real_command_12345");
        let err = runner.run(&spec).expect_err("spawn should fail");
        assert!(format!("{err:#}").contains("definitely_not_a_real_command_12345"));
    }
}
