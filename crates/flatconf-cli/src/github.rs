//! GitHub Actions publishing.
//!
//! Outputs and environment variables are appended to the files named by
//! `GITHUB_OUTPUT` and `GITHUB_ENV`. Outside a runner they are printed to stdout.

use flatconf_core::{Error, Publisher, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Where one kind of record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Append heredoc-style records to a file command file.
    File(PathBuf),
    /// Print `<label><name>=<value>` lines.
    Stdout { label: &'static str },
}

impl Target {
    fn from_env(var: &str, label: &'static str) -> Self {
        match std::env::var_os(var) {
            Some(path) if !path.is_empty() => Target::File(PathBuf::from(path)),
            _ => Target::Stdout { label },
        }
    }

    fn write(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        match self {
            Target::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(file_command(name, value).as_bytes())?;
            }
            Target::Stdout { label } => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}{}={}", label, name, value)?;
            }
        }
        Ok(())
    }
}

/// Publisher backed by GitHub file commands.
#[derive(Debug, Clone)]
pub struct GithubPublisher {
    outputs: Target,
    env: Target,
}

impl GithubPublisher {
    pub fn new(outputs: Target, env: Target) -> Self {
        Self { outputs, env }
    }

    pub fn from_env() -> Self {
        Self::new(
            Target::from_env("GITHUB_OUTPUT", ""),
            Target::from_env("GITHUB_ENV", "env "),
        )
    }
}

impl Publisher for GithubPublisher {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.outputs.write(name, value)
    }

    fn export_variable(&mut self, name: &str, value: &str) -> Result<()> {
        self.env.write(name, value)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("empty output name".to_string()));
    }
    if name.contains(['\n', '\r']) {
        return Err(Error::InvalidInput(format!(
            "output name {:?} contains a line break",
            name
        )));
    }
    Ok(())
}

/// Render a multi-line safe `name<<DELIMITER` record.
fn file_command(name: &str, value: &str) -> String {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Emit an `::error::` workflow command when running under Actions.
pub fn annotate_failure(message: &str) {
    if std::env::var_os("GITHUB_ACTIONS").is_some() {
        let escaped = message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");
        println!("::error::{}", escaped);
    }
}
