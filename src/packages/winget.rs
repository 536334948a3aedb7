// src/packages/winget.rs

//! Query the local winget tool
//!
//! Process execution sits behind [`CommandRunner`] so callers (and tests) can
//! substitute their own process plumbing.

use crate::config::CliConfig;
use crate::error::{Error, Result};
use crate::model::PackageDescriptor;
use std::process::Command;
use tracing::debug;

use super::show::parse_show_output;

/// Captured result of running an external program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a program and captures its output
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program).args(args).output().map_err(|e| {
            Error::CommandFailed(format!("Failed to run {program}: {e}. Is it installed?"))
        })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

/// Wrapper around the `winget` executable
pub struct WingetCli<R: CommandRunner = SystemCommandRunner> {
    runner: R,
    config: CliConfig,
}

impl WingetCli<SystemCommandRunner> {
    pub fn new(config: CliConfig) -> Self {
        Self::with_runner(SystemCommandRunner, config)
    }
}

impl<R: CommandRunner> WingetCli<R> {
    pub fn with_runner(runner: R, config: CliConfig) -> Self {
        Self { runner, config }
    }

    /// Arguments for `winget show` of an exact identifier
    fn show_args(&self, id: &str, version: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "show".to_string(),
            "--id".to_string(),
            id.to_string(),
            "--exact".to_string(),
        ];
        if let Some(version) = version {
            args.push("--version".to_string());
            args.push(version.to_string());
        }
        if self.config.accept_agreements {
            args.push("--accept-source-agreements".to_string());
        }
        args.push("--disable-interactivity".to_string());
        args
    }

    /// Describe a package using `winget show`
    pub fn show(&self, id: &str, version: Option<&str>) -> Result<PackageDescriptor> {
        let output = self
            .runner
            .run(&self.config.executable, &self.show_args(id, version))?;

        if !output.success() {
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            return Err(Error::CommandFailed(format!(
                "{} show {} exited with {:?}: {}",
                self.config.executable, id, output.exit_code, detail
            )));
        }

        parse_show_output(&output.stdout)
    }
}
