//! OpenSSH key and agent access.
//!
//! This module handles:
//! - Locating the `ssh-keygen` and `ssh-add` binaries
//! - Scanning the key directory for public keys
//! - Describing keys via `ssh-keygen -lv`
//! - Querying the running ssh-agent
//! - Computing fingerprints without shelling out
//! - Removing key pairs

pub mod agent;
pub mod fingerprint;
pub mod keygen;
pub mod tools;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with keys or the agent
#[derive(Error, Debug)]
pub enum SshError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Could not read directory: {0}")]
    KeyDirUnreadable(PathBuf),

    #[error("{tool} not found. Install the OpenSSH client or set {env_var} to a full path.")]
    ToolNotFound {
        tool: &'static str,
        env_var: &'static str,
    },

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ssh-agent error: {0}")]
    Agent(String),

    #[error("Invalid key name: {0}")]
    InvalidKeyName(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task cancelled")]
    Cancelled,
}
