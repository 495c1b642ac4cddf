//! CLI command groups

pub mod agent;
pub mod config;
pub mod diag;
pub mod keys;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::ssh::keygen;

/// Key directory from `--dir`, the config file, or ~/.ssh
pub(crate) fn resolve_key_dir(dir: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(keygen::ssh_dir(config.key_dir_override())?),
    }
}
