//! Shell command runner built on `duct`.

use std::path::Path;

use duct::cmd;
use tracing::{debug, instrument};

use barebones_core::{
    application::{
        ApplicationError,
        ports::{CommandRunner, CommandStatus},
    },
    error::BarebonesResult,
};

#[cfg(unix)]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Runs command lines through the platform shell.
///
/// The child inherits stdin and stderr. Stdout is inherited too unless
/// [`stdout_to_stderr`](Self::stdout_to_stderr) is set, which keeps stdout
/// free for machine-readable output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner {
    stdout_to_stderr: bool,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

impl CommandRunner for ShellRunner {
    #[instrument(skip(self), fields(cwd = %cwd.display()))]
    fn run(&self, command: &str, cwd: &Path) -> BarebonesResult<CommandStatus> {
        let (shell, flag) = SHELL;
        let mut expression = cmd(shell, [flag, command]).dir(cwd).unchecked();
        if self.stdout_to_stderr {
            expression = expression.stdout_to_stderr();
        }

        let output = expression
            .run()
            .map_err(|e| ApplicationError::CommandUnavailable {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let status = CommandStatus {
            code: output.status.code(),
        };
        debug!(code = ?status.code, "Command finished");
        Ok(status)
    }
}
