//! Shell command text for each editor operation
//!
//! The strings produced here are what ends up on the node, so they must stay
//! byte-for-byte stable.

use super::{HashType, TrustedKeyId, CONFIG_FILE, INIT_SCRIPT, KEYS_FILE};

pub fn stop() -> String {
    format!("{} stop", INIT_SCRIPT)
}

pub fn start() -> String {
    format!("{} start", INIT_SCRIPT)
}

pub fn add_server(server: &str) -> String {
    format!("echo \"server {}\" >> {}", server, CONFIG_FILE)
}

/// Deletes every line containing `server`, not only `server <address>` lines
pub fn remove_server(server: &str) -> String {
    format!("sed -i '/{}/d' {}", server, CONFIG_FILE)
}

pub fn add_trusted_key(id: TrustedKeyId) -> String {
    format!("echo \"trustedkey {}\" >> {}", id, CONFIG_FILE)
}

/// Unanchored: `trustedkey 12` also matches `trustedkey 123`
pub fn remove_trusted_key(id: TrustedKeyId) -> String {
    format!("sed -i '/trustedkey {}/d' {}", id, CONFIG_FILE)
}

pub fn add_key_password(id: TrustedKeyId, hash_type: &HashType, password: &str) -> String {
    format!("echo \"{} {} {}\" >> {}", id, hash_type, password, KEYS_FILE)
}

/// Anchored at line start and followed by whitespace, so removing `5`
/// leaves `51` and `55` entries alone
pub fn remove_key_password(id: TrustedKeyId) -> String {
    format!("sed -i '/^{}[[:space:]]/d' {}", id, KEYS_FILE)
}

/// Daemon invocation, with the key file and trusted key when given
pub fn daemon_files(trusted_key: Option<i64>) -> String {
    let mut cmd = format!("ntpd -c {}", CONFIG_FILE);
    if let Some(id) = trusted_key {
        cmd.push_str(&format!(" -k {} -t {}", KEYS_FILE, id));
    }
    cmd
}
