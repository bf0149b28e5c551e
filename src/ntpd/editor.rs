//! The editor: one shell command per configuration intent

use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use super::{command, HashType, TrustedKeyId, COMPLETION_MARKER};
use crate::channel::{CommandChannel, Shell};
use crate::error::{NtpdError, Result};

/// Every command is written for bash
const SHELL: Shell = Shell::Bash;

/// Stands in for a password in logs and errors
const PASSWORD_MASK: &str = "********";

/// Edits the NTP daemon configuration of a node through a [`CommandChannel`].
///
/// The editor holds no state besides the channel. Arguments are validated
/// before anything is sent; errors from the channel are returned untouched,
/// except that a password write masks the password in them. Only start/stop
/// check the command output.
pub struct NtpdEditor<C> {
    channel: C,
}

impl<C: CommandChannel> NtpdEditor<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Stop the NTP daemon, expecting the init script to report `done`
    pub fn stop(&mut self) -> Result<()> {
        info!("stopping ntpd");
        self.send_verified(&command::stop())
    }

    /// Start the NTP daemon, expecting the init script to report `done`
    pub fn start(&mut self) -> Result<()> {
        info!("starting ntpd");
        self.send_verified(&command::start())
    }

    /// Append a `server <address>` line to `/etc/ntp.conf`.
    ///
    /// No duplicate check is made.
    pub fn add_server(&mut self, server: &str) -> Result<()> {
        require_non_empty(server, "server")?;
        self.send(&command::add_server(server)).map(drop)
    }

    /// Delete every `/etc/ntp.conf` line containing `server`.
    ///
    /// The match is a plain substring: any other line that happens to contain
    /// the address goes too.
    pub fn remove_server(&mut self, server: &str) -> Result<()> {
        require_non_empty(server, "server")?;
        self.send(&command::remove_server(server)).map(drop)
    }

    /// Append a `trustedkey <id>` line to `/etc/ntp.conf`
    pub fn add_trusted_key(&mut self, id: i64) -> Result<()> {
        let id = TrustedKeyId::new(id)?;
        self.send(&command::add_trusted_key(id)).map(drop)
    }

    /// Delete every `/etc/ntp.conf` line containing `trustedkey <id>`.
    ///
    /// Unanchored, so removing key 12 also removes `trustedkey 123`.
    pub fn remove_trusted_key(&mut self, id: i64) -> Result<()> {
        let id = TrustedKeyId::new(id)?;
        self.send(&command::remove_trusted_key(id)).map(drop)
    }

    /// Append `<id> <type> <password>` to `/etc/ntp.keys`
    pub fn add_trusted_key_password(
        &mut self,
        id: i64,
        password: &SecretString,
        hash_type: &HashType,
    ) -> Result<()> {
        let id = TrustedKeyId::new(id)?;
        let secret = password.expose_secret();
        require_non_empty(secret, "password")?;

        let cmd = Zeroizing::new(command::add_key_password(id, hash_type, secret));
        let shown = command::add_key_password(id, hash_type, PASSWORD_MASK);
        debug!("$ {}", shown);
        self.channel
            .execute(&cmd, SHELL)
            .map(drop)
            .map_err(|e| e.redact(&shown, secret, PASSWORD_MASK))
    }

    /// Delete the `/etc/ntp.keys` entries of key `id`
    pub fn remove_trusted_key_password(&mut self, id: i64) -> Result<()> {
        let id = TrustedKeyId::new(id)?;
        self.send(&command::remove_key_password(id)).map(drop)
    }

    /// Run `ntpd` against `/etc/ntp.conf`, and `/etc/ntp.keys` with the
    /// given trusted key when `use_key_file` is set.
    ///
    /// `trusted_key` is ignored without `use_key_file`.
    pub fn configure_daemon_files(
        &mut self,
        use_key_file: bool,
        trusted_key: Option<i64>,
    ) -> Result<()> {
        let key = if use_key_file {
            let id = trusted_key.ok_or_else(|| {
                NtpdError::precondition("a trusted key id is required when using the key file")
            })?;
            Some(id)
        } else {
            None
        };
        self.send(&command::daemon_files(key)).map(drop)
    }

    fn send(&mut self, cmd: &str) -> Result<String> {
        debug!("$ {}", cmd);
        self.channel.execute(cmd, SHELL)
    }

    fn send_verified(&mut self, cmd: &str) -> Result<()> {
        let output = self.send(cmd)?;
        if output.contains(COMPLETION_MARKER) {
            return Ok(());
        }

        warn!("`{}` did not print {:?}", cmd, COMPLETION_MARKER);
        Err(NtpdError::VerificationFailure {
            command: cmd.to_string(),
            output,
        })
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(NtpdError::precondition(format!("{} must not be empty", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Records commands and answers with canned output
    #[derive(Default)]
    struct Scripted {
        sent: Vec<(String, Shell)>,
        replies: VecDeque<Result<String>>,
    }

    impl Scripted {
        fn replying(reply: &str) -> Self {
            let mut channel = Self::default();
            channel.replies.push_back(Ok(reply.to_string()));
            channel
        }

        fn commands(&self) -> Vec<&str> {
            self.sent.iter().map(|(c, _)| c.as_str()).collect()
        }
    }

    impl CommandChannel for Scripted {
        fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
            self.sent.push((command.to_string(), shell));
            self.replies.pop_front().unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    #[test]
    fn start_accepts_done_marker() {
        let mut editor = NtpdEditor::new(Scripted::replying("Starting ntpd... done"));
        editor.start().unwrap();
        assert_eq!(
            editor.channel().sent,
            vec![("/etc/init.d/ntp start".to_string(), Shell::Bash)]
        );
    }

    #[test]
    fn start_without_marker_fails_verification() {
        let mut editor = NtpdEditor::new(Scripted::replying("Starting ntpd... failed"));
        match editor.start().unwrap_err() {
            NtpdError::VerificationFailure { command, output } => {
                assert_eq!(command, "/etc/init.d/ntp start");
                assert_eq!(output, "Starting ntpd... failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stop_checks_marker_too() {
        let mut editor = NtpdEditor::new(Scripted::replying("Stopping ntpd... done\n"));
        editor.stop().unwrap();
        assert_eq!(editor.channel().commands(), ["/etc/init.d/ntp stop"]);

        let mut editor = NtpdEditor::new(Scripted::replying(""));
        assert!(matches!(
            editor.stop(),
            Err(NtpdError::VerificationFailure { .. })
        ));
    }

    #[test]
    fn server_commands() {
        let mut editor = NtpdEditor::new(Scripted::default());
        editor.add_server("192.168.1.10").unwrap();
        editor.add_server("192.168.1.10").unwrap();
        editor.remove_server("pool.ntp.org").unwrap();
        assert_eq!(
            editor.channel().commands(),
            [
                "echo \"server 192.168.1.10\" >> /etc/ntp.conf",
                "echo \"server 192.168.1.10\" >> /etc/ntp.conf",
                "sed -i '/pool.ntp.org/d' /etc/ntp.conf",
            ]
        );
    }

    #[test]
    fn empty_values_are_rejected_before_sending() {
        let mut editor = NtpdEditor::new(Scripted::default());
        assert!(matches!(
            editor.add_server(""),
            Err(NtpdError::PreconditionViolation(_))
        ));
        assert!(matches!(
            editor.remove_server(""),
            Err(NtpdError::PreconditionViolation(_))
        ));
        assert!(matches!(
            editor.add_trusted_key_password(5, &secret(""), &HashType::md5()),
            Err(NtpdError::PreconditionViolation(_))
        ));
        assert!(editor.channel().sent.is_empty());
    }

    #[test]
    fn out_of_range_key_ids_send_nothing() {
        let mut editor = NtpdEditor::new(Scripted::default());
        for id in [-7, 0, 65535, 70000] {
            assert!(editor.add_trusted_key(id).is_err());
            assert!(editor.remove_trusted_key(id).is_err());
            assert!(editor
                .add_trusted_key_password(id, &secret("secret"), &HashType::md5())
                .is_err());
            assert!(editor.remove_trusted_key_password(id).is_err());
        }
        assert!(editor.channel().sent.is_empty());
    }

    #[test]
    fn trusted_key_commands() {
        let mut editor = NtpdEditor::new(Scripted::default());
        editor.add_trusted_key(1).unwrap();
        editor.remove_trusted_key(65534).unwrap();
        editor
            .add_trusted_key_password(5, &secret("secret"), &HashType::default())
            .unwrap();
        editor
            .add_trusted_key_password(6, &secret("s3cr3t"), &HashType::new("SHA1").unwrap())
            .unwrap();
        editor.remove_trusted_key_password(5).unwrap();
        assert_eq!(
            editor.channel().commands(),
            [
                "echo \"trustedkey 1\" >> /etc/ntp.conf",
                "sed -i '/trustedkey 65534/d' /etc/ntp.conf",
                "echo \"5 M secret\" >> /etc/ntp.keys",
                "echo \"6 SHA1 s3cr3t\" >> /etc/ntp.keys",
                "sed -i '/^5[[:space:]]/d' /etc/ntp.keys",
            ]
        );
    }

    #[test]
    fn failed_password_write_does_not_leak_the_password() {
        let mut channel = Scripted::default();
        channel.replies.push_back(Err(NtpdError::CommandFailed {
            command: "echo \"5 M hunter2\" >> /etc/ntp.keys".into(),
            status: 1,
            output: "bash: /etc/ntp.keys: Permission denied".into(),
        }));
        channel
            .replies
            .push_back(Err(NtpdError::Channel("lost `hunter2` midway".into())));

        let mut editor = NtpdEditor::new(channel);
        let err = editor
            .add_trusted_key_password(5, &secret("hunter2"), &HashType::md5())
            .unwrap_err();
        match &err {
            NtpdError::CommandFailed { command, status, .. } => {
                assert_eq!(command, "echo \"5 M ********\" >> /etc/ntp.keys");
                assert_eq!(*status, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.to_string().contains("hunter2"));

        let err = editor
            .add_trusted_key_password(5, &secret("hunter2"), &HashType::md5())
            .unwrap_err();
        assert!(!err.to_string().contains("hunter2"));

        // The node still received the real line
        assert_eq!(editor.channel().commands()[0], "echo \"5 M hunter2\" >> /etc/ntp.keys");
    }

    #[test]
    fn configure_daemon_files_variants() {
        let mut editor = NtpdEditor::new(Scripted::default());
        editor.configure_daemon_files(false, None).unwrap();
        editor.configure_daemon_files(false, Some(9)).unwrap();
        editor.configure_daemon_files(true, Some(7)).unwrap();
        assert_eq!(
            editor.channel().commands(),
            [
                "ntpd -c /etc/ntp.conf",
                "ntpd -c /etc/ntp.conf",
                "ntpd -c /etc/ntp.conf -k /etc/ntp.keys -t 7",
            ]
        );
    }

    #[test]
    fn key_file_without_key_id_is_rejected() {
        let mut editor = NtpdEditor::new(Scripted::default());
        assert!(matches!(
            editor.configure_daemon_files(true, None),
            Err(NtpdError::PreconditionViolation(_))
        ));
        assert!(editor.channel().sent.is_empty());
    }

    #[test]
    fn channel_errors_pass_through() {
        let mut channel = Scripted::default();
        channel.replies.push_back(Err(NtpdError::Channel("connection reset".into())));
        channel.replies.push_back(Err(NtpdError::CommandFailed {
            command: "sed".into(),
            status: 4,
            output: "Permission denied".into(),
        }));

        let mut editor = NtpdEditor::new(channel);
        assert!(matches!(
            editor.start(),
            Err(NtpdError::Channel(msg)) if msg == "connection reset"
        ));
        assert!(matches!(
            editor.remove_server("10.0.0.1"),
            Err(NtpdError::CommandFailed { status: 4, .. })
        ));
    }
}
