//! Node registry storage
//!
//! The registry is a plain JSON file, by default
//! `<config dir>/ntpd-remote/nodes.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{NtpdError, Result};

use super::NodeList;

const APP_DIR: &str = "ntpd-remote";
const NODES_FILE: &str = "nodes.json";

/// Default location of the node registry
pub fn default_nodes_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(NODES_FILE))
        .ok_or_else(|| NtpdError::InvalidConfig("cannot determine the config directory".into()))
}

/// Load the registry, a missing file is an empty registry
pub fn load_nodes(path: &Path) -> Result<NodeList> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, no nodes registered", path.display());
            return Ok(NodeList::new());
        }
        Err(e) => return Err(e.into()),
    };

    let nodes = serde_json::from_slice(&data)?;
    Ok(nodes)
}

/// Write the registry, creating its directory if needed
pub fn save_nodes(path: &Path, nodes: &NodeList) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(nodes)?;

    // Write to a temp file first, then rename
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    debug!("saved {} node(s) to {}", nodes.len(), path.display());
    Ok(())
}
