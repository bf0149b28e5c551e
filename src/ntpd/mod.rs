//! NTP daemon configuration editor
//!
//! All state lives in two files on the node:
//! - `/etc/ntp.conf`: `server <address>` and `trustedkey <id>` lines
//! - `/etc/ntp.keys`: `<id> <type> <password>` lines

pub mod command;
mod editor;
mod key;

pub use editor::NtpdEditor;
pub use key::{HashType, TrustedKeyId, KEY_ID_LIMIT};

/// Main daemon configuration file
pub const CONFIG_FILE: &str = "/etc/ntp.conf";

/// Symmetric key file
pub const KEYS_FILE: &str = "/etc/ntp.keys";

/// Init script controlling the daemon
pub const INIT_SCRIPT: &str = "/etc/init.d/ntp";

/// Substring the init script prints once start/stop has completed
pub const COMPLETION_MARKER: &str = "done";
