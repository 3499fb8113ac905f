//! External Command Execution
//!
//! Every tool the pipeline shells out to goes through [`CommandRunner`], so a
//! run can be replayed against a recorder instead of a real toolchain.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::BuildError;

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
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

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn envs<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env.extend(vars);
        self
    }

    /// Whether any argument equals `arg`
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Shell-like rendering for logs and errors
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// Result of a command execution
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Create from std::process::Output
    pub fn from_output(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Get combined output (stdout + stderr)
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Capability to run an external command to completion
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = Result<CommandOutput, BuildError>> + Send;
}

/// Run a command and turn a non-zero exit into [`BuildError::CommandFailed`]
pub async fn run_checked<R: CommandRunner>(
    runner: &R,
    spec: &CommandSpec,
) -> Result<CommandOutput, BuildError> {
    info!("Running: {}", spec.display());
    if let Some(ref dir) = spec.current_dir {
        debug!("  in {:?}", dir);
    }

    let output = runner.run(spec).await?;

    if !output.stdout.is_empty() {
        debug!("stdout:\n{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        debug!("stderr:\n{}", output.stderr);
    }

    if !output.success {
        return Err(BuildError::CommandFailed {
            command: spec.display(),
            code: output.exit_code,
            output: output.combined_output(),
        });
    }

    Ok(output)
}

/// Runs commands as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    capture: bool,
}

impl ProcessRunner {
    /// Child output goes straight to the terminal
    pub fn inherit() -> Self {
        Self { capture: false }
    }

    /// Child output is captured and returned
    pub fn captured() -> Self {
        Self { capture: true }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, BuildError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(ref dir) = spec.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let spawn_error = |source| BuildError::Spawn {
            program: spec.program.clone(),
            source,
        };

        if self.capture {
            let output = cmd
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await
                .map_err(spawn_error)?;
            Ok(CommandOutput::from_output(output))
        } else {
            let status = cmd
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(spawn_error)?;
            Ok(CommandOutput {
                success: status.success(),
                exit_code: status.code(),
                ..Default::default()
            })
        }
    }
}
