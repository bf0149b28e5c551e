//! SSH channel using russh

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use russh::client;
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tokio::runtime::Runtime;

use super::{CommandChannel, Shell};
use crate::config::Node;
use crate::error::{NtpdError, Result};

/// SSH client handler
pub struct NodeClient {
    host: String,
    port: u16,
    check_host_key: bool,
}

impl NodeClient {
    pub fn new(node: &Node) -> Self {
        Self {
            host: node.host.clone(),
            port: node.port,
            check_host_key: node.check_host_key,
        }
    }
}

#[async_trait]
impl client::Handler for NodeClient {
    type Error = russh::Error;

    /// Called when server sends its public key for verification
    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        if !self.check_host_key {
            // Any host key is accepted unless the node asks for checking
            return Ok(true);
        }
        Ok(russh_keys::check_known_hosts(
            &self.host,
            self.port,
            server_public_key,
        )?)
    }
}

/// Runs commands on a remote node over one SSH connection.
///
/// Each command gets its own session channel. The connection is driven by a
/// private tokio runtime, so callers stay synchronous.
pub struct SshChannel {
    runtime: Runtime,
    session: client::Handle<NodeClient>,
    node: String,
}

impl SshChannel {
    /// Connect and authenticate to a node with its identity file
    pub fn connect(node: &Node) -> Result<Self> {
        let runtime = Runtime::new()
            .map_err(|e| NtpdError::Channel(format!("cannot create async runtime: {}", e)))?;

        let keypair = russh_keys::load_secret_key(&node.identity_file, None).map_err(|e| {
            NtpdError::Channel(format!(
                "cannot load identity {}: {}",
                node.identity_file.display(),
                e
            ))
        })?;

        let session = runtime.block_on(open_session(node, keypair))?;
        debug!("connected to {} ({})", node.name, node.connection_string());

        Ok(Self {
            runtime,
            session,
            node: node.name.clone(),
        })
    }

    /// Disconnect from the node
    pub fn close(self) -> Result<()> {
        self.runtime
            .block_on(
                self.session
                    .disconnect(Disconnect::ByApplication, "", "en"),
            )
            .map_err(channel_err)
    }
}

impl CommandChannel for SshChannel {
    fn execute(&mut self, command: &str, shell: Shell) -> Result<String> {
        let quoted = shlex::try_quote(command)
            .map_err(|e| NtpdError::Channel(format!("cannot quote `{}`: {}", command, e)))?;
        let remote = format!("{} -c {}", shell.program(), quoted);

        let exit = self.runtime.block_on(exec(&self.session, &remote))?;
        let output = String::from_utf8_lossy(&exit.output).into_owned();
        trace!("[{}] {:?}, {} bytes of output", self.node, exit.status, output.len());

        outcome(command, &self.node, exit.status, exit.signal, output)
    }
}

/// What the node reported when a command finished
struct Exit {
    status: Option<u32>,
    signal: Option<String>,
    output: Vec<u8>,
}

fn outcome(
    command: &str,
    node: &str,
    status: Option<u32>,
    signal: Option<String>,
    output: String,
) -> Result<String> {
    match (status, signal) {
        (Some(0), _) => Ok(output),
        (Some(status), _) => Err(NtpdError::CommandFailed {
            command: command.to_string(),
            status: i32::try_from(status).unwrap_or(i32::MAX),
            output,
        }),
        (None, Some(signal)) => Err(NtpdError::CommandKilled {
            command: command.to_string(),
            signal,
            output,
        }),
        (None, None) => Err(NtpdError::Channel(format!(
            "`{}` on {} finished without an exit status",
            command, node
        ))),
    }
}

async fn open_session(
    node: &Node,
    keypair: russh_keys::key::KeyPair,
) -> Result<client::Handle<NodeClient>> {
    let config = client::Config {
        inactivity_timeout: Some(Duration::from_secs(3600)),
        keepalive_interval: Some(Duration::from_secs(30)),
        keepalive_max: 3,
        ..Default::default()
    };

    let addr = (node.host.as_str(), node.port);
    let mut session = client::connect(Arc::new(config), addr, NodeClient::new(node))
        .await
        .map_err(channel_err)?;

    let authenticated = session
        .authenticate_publickey(&node.user, Arc::new(keypair))
        .await
        .map_err(channel_err)?;

    if !authenticated {
        return Err(NtpdError::Channel(format!(
            "authentication as '{}' rejected by {}",
            node.user, node.host
        )));
    }

    Ok(session)
}

/// Run one command, collecting stdout and stderr in arrival order
async fn exec(session: &client::Handle<NodeClient>, command: &str) -> Result<Exit> {
    let mut channel = session.channel_open_session().await.map_err(channel_err)?;
    channel.exec(true, command).await.map_err(channel_err)?;

    let mut exit = Exit {
        status: None,
        signal: None,
        output: Vec::new(),
    };

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => exit.output.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, .. } => exit.output.extend_from_slice(data),
            ChannelMsg::ExitStatus { exit_status } => exit.status = Some(exit_status),
            ChannelMsg::ExitSignal { signal_name, .. } => {
                exit.signal = Some(format!("{:?}", signal_name))
            }
            _ => {}
        }
    }

    Ok(exit)
}

fn channel_err(e: russh::Error) -> NtpdError {
    NtpdError::Channel(e.to_string())
}
