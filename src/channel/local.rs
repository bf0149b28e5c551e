//! Local shell channel

use std::process::{Command, ExitStatus};

use log::trace;

use super::{CommandChannel, Shell};
use crate::error::{NtpdError, Result};

/// Runs commands with a shell on this machine.
///
/// Useful when the tool itself runs on the node (e.g. inside a test
/// container).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalChannel;

impl LocalChannel {
    pub fn new() -> Self {
        Self
    }
}

impl CommandChannel for LocalChannel {
    fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
        let out = Command::new(shell.program())
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| NtpdError::Channel(format!("failed to spawn {}: {}", shell, e)))?;

        // stdout first, stderr after: the init scripts report on stdout
        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));
        trace!("[local] {}, {} bytes of output", out.status, output.len());

        match out.status.code() {
            Some(0) => Ok(output),
            Some(status) => Err(NtpdError::CommandFailed {
                command: command.to_string(),
                status,
                output,
            }),
            None => Err(NtpdError::CommandKilled {
                command: command.to_string(),
                signal: signal_name(&out.status),
                output,
            }),
        }
    }
}

#[cfg(unix)]
fn signal_name(status: &ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    status
        .signal()
        .map_or_else(|| "unknown".to_string(), |sig| sig.to_string())
}

#[cfg(not(unix))]
fn signal_name(_status: &ExitStatus) -> String {
    "unknown".to_string()
}
