use std::process::Command;

use crate::error::DipiError;

/// The outcome of a shell command, local or remote: exit code, abnormal
/// termination signal, and captured output.
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    pub code: Option<i32>,
    pub signal: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0) && self.signal.is_none()
    }
}

/// The local shell-command executor boundary: run this string, report
/// exit code and captured streams.
pub trait ShellExecutor {
    fn execute(&self, command: &str) -> Result<ExecOutcome, DipiError>;
}

pub struct ShellRunner;

impl ShellExecutor for ShellRunner {
    fn execute(&self, command: &str) -> Result<ExecOutcome, DipiError> {
        log::debug!("executing: {}", command);
        let output = Command::new("/bin/sh").arg("-c").arg(command).output()?;
        Ok(ExecOutcome {
            code: output.status.code(),
            signal: None,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
