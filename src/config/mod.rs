//! Configuration management for ntpd-remote
//!
//! Handles the registry of nodes the tool can reach over SSH.

mod node;
mod storage;

pub use node::{default_identity_file, Node, NodeList};
pub use storage::{default_nodes_path, load_nodes, save_nodes};
