//! Command channels - the facility that runs shell commands on a node
//!
//! The editor only ever talks to a [`CommandChannel`]. Two implementations
//! ship with the crate:
//! - [`LocalChannel`] runs commands with a local shell
//! - [`SshChannel`] runs commands on a remote node over SSH

mod local;
mod ssh;

pub use local::LocalChannel;
pub use ssh::{NodeClient, SshChannel};

use std::fmt;

use crate::error::Result;

/// Shell context a command is executed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shell {
    #[default]
    Bash,
    Sh,
}

impl Shell {
    /// Program name of the shell
    pub fn program(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Sh => "sh",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Runs a shell command on a node and returns its captured output.
///
/// Implementations must report connectivity problems as
/// [`NtpdError::Channel`](crate::NtpdError::Channel) and commands that ran
/// but failed as [`NtpdError::CommandFailed`](crate::NtpdError::CommandFailed).
pub trait CommandChannel {
    fn execute(&mut self, command: &str, shell: Shell) -> Result<String>;
}

impl<C: CommandChannel + ?Sized> CommandChannel for &mut C {
    fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
        (**self).execute(command, shell)
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
        (**self).execute(command, shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CommandChannel for Echo {
        fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
            Ok(format!("{shell}: {command}"))
        }
    }

    #[test]
    fn shell_program_names() {
        assert_eq!(Shell::Bash.program(), "bash");
        assert_eq!(Shell::Sh.program(), "sh");
        assert_eq!(Shell::default(), Shell::Bash);
    }

    #[test]
    fn boxed_and_borrowed_channels_forward() {
        let mut boxed: Box<dyn CommandChannel> = Box::new(Echo);
        assert_eq!(boxed.execute("true", Shell::Sh).unwrap(), "sh: true");

        let mut echo = Echo;
        let mut borrowed = &mut echo;
        assert_eq!(borrowed.execute("true", Shell::Bash).unwrap(), "bash: true");
    }
}
