//! ntpd-remote - remote control of the NTP daemon on test nodes
//!
//! This crate provides:
//! - An editor that turns NTP configuration intents into shell commands
//!   for `/etc/ntp.conf` and `/etc/ntp.keys`
//! - A command channel abstraction with local and SSH implementations
//! - A registry of named nodes for the command-line tool

pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod ntpd;

pub use channel::{CommandChannel, LocalChannel, Shell, SshChannel};
pub use error::{NtpdError, Result};
pub use ntpd::{HashType, NtpdEditor, TrustedKeyId, CONFIG_FILE, KEYS_FILE};
