use thiserror::Error;

pub type Result<T> = std::result::Result<T, NtpdError>;

#[derive(Debug, Error)]
pub enum NtpdError {
    /// An argument was rejected before any command was sent.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// The command ran but its output lacked the completion marker.
    #[error("`{command}` did not report completion, output was: {output:?}")]
    VerificationFailure { command: String, output: String },

    #[error("Command channel failure: {0}")]
    Channel(String),

    #[error("`{command}` exited with status {status}: {output}")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },

    /// The command ran but was terminated by a signal.
    #[error("`{command}` was killed by signal {signal}: {output}")]
    CommandKilled {
        command: String,
        signal: String,
        output: String,
    },

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Node '{0}' already exists")]
    NodeAlreadyExists(String),

    #[error("No nodes configured. Run 'ntpd-remote node add' first.")]
    NoNodesConfigured,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NtpdError {
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolation(msg.into())
    }

    /// Replace the command text with `shown` and mask `secret` everywhere
    /// else the error carries text from the node.
    pub(crate) fn redact(self, shown: &str, secret: &str, mask: &str) -> Self {
        let scrub = |text: String| text.replace(secret, mask);
        match self {
            Self::VerificationFailure { output, .. } => Self::VerificationFailure {
                command: shown.to_string(),
                output: scrub(output),
            },
            Self::CommandFailed { status, output, .. } => Self::CommandFailed {
                command: shown.to_string(),
                status,
                output: scrub(output),
            },
            Self::CommandKilled { signal, output, .. } => Self::CommandKilled {
                command: shown.to_string(),
                signal,
                output: scrub(output),
            },
            Self::Channel(msg) => Self::Channel(scrub(msg)),
            other => other,
        }
    }
}
