//! Interactive questions asked on the controlling terminal.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

pub trait Prompter {
    /// Ask `question` and return the raw answer line. EOF yields an empty answer.
    fn ask(&self, question: &str) -> Result<String>;
}

/// Prompts on stdout and reads one line from stdin.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} ").context("write prompt")?;
        stdout.flush().context("flush prompt")?;
        drop(stdout);

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read answer from stdin")?;
        Ok(line)
    }
}
