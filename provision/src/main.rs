//! Single-node Hadoop provisioner.
//!
//! `install` walks a fresh Debian/Ubuntu host from a bare system to running
//! HDFS and YARN daemons. Every step checks its precondition first, so a
//! re-run only does what is still missing.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use hadoop_provision::core::types::{Completed, RunOutcome, StepOutcome};
use hadoop_provision::exit_codes;
use hadoop_provision::install::{InstallRequest, run_install};
use hadoop_provision::io::config::{
    DEFAULT_CONFIG_FILE, ProvisionConfig, load_config, render_config, write_config,
};
use hadoop_provision::io::host::HostEnv;
use hadoop_provision::io::process::SystemRunner;
use hadoop_provision::io::prompt::StdinPrompter;
use hadoop_provision::logging;
use hadoop_provision::status::collect_status;
use hadoop_provision::steps::InstallOptions;
use hadoop_provision::steps::handoff::hand_off;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "hadoop-provision",
    version,
    about = "Install and start a single-node Hadoop cluster"
)]
struct Cli {
    /// Provisioner config file. Missing file means built-in defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision this host and start HDFS and YARN.
    Install {
        /// Answer the confirmation prompt with yes.
        #[arg(short, long)]
        yes: bool,
        /// Hadoop user; skips the username prompt.
        #[arg(long)]
        user: Option<String>,
        /// Enable the SSH server at boot; skips the prompt.
        #[arg(long, value_enum)]
        ssh_at_boot: Option<Toggle>,
        /// Do not start a new interactive shell at the end.
        #[arg(long)]
        no_shell: bool,
    },
    /// Report which provisioning steps are already in place.
    Status {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default config to `--config`.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective config.
    Show,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Toggle {
    Yes,
    No,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::Yes
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            println!("Error: {:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Install {
            yes,
            user,
            ssh_at_boot,
            no_shell,
        } => {
            let options = InstallOptions {
                assume_yes: yes,
                user,
                ssh_at_boot: ssh_at_boot.map(bool::from),
            };
            cmd_install(&cli.config, &options, no_shell)
        }
        Command::Status { json } => cmd_status(&cli.config, json),
        Command::Config(ConfigCommand::Init { force }) => cmd_config_init(&cli.config, force),
        Command::Config(ConfigCommand::Show) => cmd_config_show(&cli.config),
    }
}

fn cmd_install(config_path: &Path, options: &InstallOptions, no_shell: bool) -> Result<i32> {
    let config = load_config(config_path)?;
    let host = HostEnv::from_process()?;
    let runner = SystemRunner::from_config(&config.exec);
    let request = InstallRequest {
        config: &config,
        host: &host,
        options,
    };

    match run_install(&request, &runner, &StdinPrompter)? {
        RunOutcome::Aborted => {
            println!("Aborted by user; no changes were made.");
            Ok(exit_codes::ABORTED)
        }
        RunOutcome::Completed(done) => {
            print!("{}", render_summary(&done));
            if no_shell {
                return Ok(exit_codes::OK);
            }
            Ok(handoff_exit_code(hand_off(&done.shell, &done.env)))
        }
    }
}

fn cmd_status(config_path: &Path, json: bool) -> Result<i32> {
    let config = load_config(config_path)?;
    let host = HostEnv::from_process()?;
    let status = collect_status(&config, &host)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        status.print();
    }
    Ok(exit_codes::OK)
}

fn cmd_config_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &ProvisionConfig::default())?;
    println!("Wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_config_show(config_path: &Path) -> Result<i32> {
    let config = load_config(config_path)?;
    print!("{}", render_config(&config)?);
    Ok(exit_codes::OK)
}

fn render_summary(done: &Completed) -> String {
    let mut out = String::from("\nProvisioning summary\n====================\n");
    for report in &done.reports {
        let mark = match report.outcome {
            StepOutcome::Applied => "[DONE]",
            StepOutcome::Skipped => "[SKIP]",
        };
        out.push_str(&format!("{mark} {:<22} {}\n", report.step, report.detail));
    }
    out.push_str("\nHadoop is running:\n");
    for (label, url) in &done.console_urls {
        out.push_str(&format!("  {label:<16} {url}\n"));
    }
    out
}

/// Provisioning already succeeded when the handoff runs, so a failed exec is
/// only reported.
fn handoff_exit_code(result: Result<()>) -> i32 {
    if let Err(err) = result {
        warn!(error = %format!("{err:#}"), "shell handoff failed");
        println!("[WARN] Could not start a new shell ({err:#}); open a new terminal to pick up the Hadoop environment");
    }
    exit_codes::OK
}
