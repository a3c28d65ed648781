use std::process::Command;

use tracing::{error, info};

/// Captured result of a child process
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process could not be spawned or was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Trimmed stdout when the command succeeded
    pub fn stdout_if_success(&self) -> Option<&str> {
        self.success().then(|| self.stdout.trim())
    }
}

/// Runs external commands synchronously.
///
/// A failing command never aborts the caller: non-zero exits and spawn
/// errors come back as a `CommandOutput` whose `success()` is false.
pub trait Shell {
    /// Run without logging. Used for probes where failure is an expected answer.
    fn output(&self, program: &str, args: &[&str]) -> CommandOutput;

    /// Run and log the outcome
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        let output = self.output(program, args);
        let line = command_line(program, args);

        if output.success() {
            info!(command = %line, "Command executed successfully");
        } else {
            error!(
                command = %line,
                status = ?output.status,
                stderr = %output.stderr.trim(),
                stdout = %output.stdout.trim(),
                "Command failed"
            );
        }

        output
    }
}

/// Shell backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn output(&self, program: &str, args: &[&str]) -> CommandOutput {
        match Command::new(program).args(args).output() {
            Ok(output) => CommandOutput {
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => CommandOutput {
                status: None,
                stdout: String::new(),
                stderr: e.to_string(),
            },
        }
    }
}

pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
