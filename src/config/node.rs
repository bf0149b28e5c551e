//! Node configuration structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{NtpdError, Result};

/// A single SSH-reachable test node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique name for this node (e.g., "ops1", "hs2")
    pub name: String,
    /// Hostname or IP address
    pub host: String,
    /// SSH port (default: 22)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username for SSH connection
    pub user: String,
    /// Private key used to authenticate
    #[serde(default = "default_identity_file")]
    pub identity_file: PathBuf,
    /// Optional description
    #[serde(default)]
    pub description: String,
    /// Verify the host key against `~/.ssh/known_hosts`
    #[serde(default)]
    pub check_host_key: bool,
}

fn default_port() -> u16 {
    22
}

/// `~/.ssh/id_ed25519`
pub fn default_identity_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".ssh")
        .join("id_ed25519")
}

impl Node {
    /// Create a new node configuration
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            user: user.into(),
            identity_file: default_identity_file(),
            description: String::new(),
            check_host_key: false,
        }
    }

    pub fn with_identity_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity_file = path.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_host_key_check(mut self, check: bool) -> Self {
        self.check_host_key = check;
        self
    }

    /// Get the SSH connection string (user@host:port)
    pub fn connection_string(&self) -> String {
        if self.port == 22 {
            format!("{}@{}", self.user, self.host)
        } else {
            format!("{}@{}:{}", self.user, self.host, self.port)
        }
    }
}

/// All registered nodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<Node>,
}

impl NodeList {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a node, names must be unique
    pub fn add(&mut self, node: Node) -> Result<()> {
        if self.get(&node.name).is_some() {
            return Err(NtpdError::NodeAlreadyExists(node.name));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Remove a node by name
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        let pos = self.nodes.iter().position(|n| n.name == name)?;
        Some(self.nodes.remove(pos))
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The only node, if exactly one is registered
    pub fn single(&self) -> Option<&Node> {
        match self.nodes.as_slice() {
            [node] => Some(node),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_string_hides_default_port() {
        assert_eq!(Node::new("a", "10.0.0.1", 22, "root").connection_string(), "root@10.0.0.1");
        assert_eq!(
            Node::new("a", "10.0.0.1", 2222, "admin").connection_string(),
            "admin@10.0.0.1:2222"
        );
    }

    #[test]
    fn names_are_unique() {
        let mut nodes = NodeList::new();
        nodes.add(Node::new("ops1", "10.0.0.1", 22, "root")).unwrap();
        assert!(matches!(
            nodes.add(Node::new("ops1", "10.0.0.2", 22, "root")),
            Err(NtpdError::NodeAlreadyExists(name)) if name == "ops1"
        ));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.single().unwrap().host, "10.0.0.1");

        nodes.add(Node::new("ops2", "10.0.0.2", 22, "root")).unwrap();
        assert!(nodes.single().is_none());
        assert_eq!(nodes.remove("ops1").unwrap().host, "10.0.0.1");
        assert!(nodes.remove("ops1").is_none());
    }

    #[test]
    fn optional_fields_have_defaults() {
        let node: Node = serde_json::from_str(
            r#"{"name": "hs1", "host": "hs1.lab", "user": "root"}"#,
        )
        .unwrap();
        assert_eq!(node.port, 22);
        assert_eq!(node.identity_file, default_identity_file());
        assert!(node.description.is_empty());
        assert!(!node.check_host_key);
    }
}
