//! Diagnostic and debugging commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted, status_line};
use crate::config::Config;
use crate::ssh::tools::{self, Tool};
use crate::ssh::{agent, keygen};

#[derive(Subcommand, Debug)]
pub enum DiagCommands {
    /// Show all paths in use (config, key directory, tools)
    Paths,

    /// Verify that keys, tools and the agent are usable
    Check,
}

#[derive(Serialize)]
struct PathsResult {
    config_file: String,
    key_dir: String,
    ssh_keygen: String,
    ssh_add: String,
}

#[derive(Serialize)]
struct CheckResult {
    config_exists: bool,
    key_dir_exists: bool,
    public_key_count: usize,
    ssh_keygen_found: bool,
    ssh_add_found: bool,
    agent_running: bool,
    agent_identities: Option<usize>,
}

pub async fn run(command: DiagCommands, format: OutputFormat, _quiet: bool) -> Result<()> {
    match command {
        DiagCommands::Paths => paths(format).await,
        DiagCommands::Check => check(format).await,
    }
}

fn or_error<E>(value: Result<std::path::PathBuf, E>) -> String {
    value
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "<error>".to_string())
}

async fn paths(format: OutputFormat) -> Result<()> {
    let config = Config::load().unwrap_or_default();

    let result = PathsResult {
        config_file: or_error(Config::config_path()),
        key_dir: or_error(keygen::ssh_dir(config.key_dir_override())),
        ssh_keygen: tools::resolve(Tool::SshKeygen, config.tools.ssh_keygen.as_deref()),
        ssh_add: tools::resolve(Tool::SshAdd, config.tools.ssh_add.as_deref()),
    };

    print_formatted(&result, format, |r| {
        [
            format!("Config file:  {}", r.config_file),
            format!("Key dir:      {}", r.key_dir),
            format!("ssh-keygen:   {}", r.ssh_keygen),
            format!("ssh-add:      {}", r.ssh_add),
        ]
        .join("\n")
    });

    Ok(())
}

async fn check(format: OutputFormat) -> Result<()> {
    let config_exists = Config::config_path().is_ok_and(|p| p.exists());
    let config = Config::load().unwrap_or_default();

    let key_dir = keygen::ssh_dir(config.key_dir_override()).ok();
    let key_dir_exists = key_dir.as_ref().is_some_and(|d| d.is_dir());
    let public_key_count = key_dir
        .as_ref()
        .and_then(|d| keygen::scan_public_keys(d).ok())
        .map_or(0, |keys| keys.len());

    let ssh_keygen_found =
        tools::resolve_checked(Tool::SshKeygen, config.tools.ssh_keygen.as_deref()).is_ok();
    let ssh_add = tools::resolve_checked(Tool::SshAdd, config.tools.ssh_add.as_deref());
    let ssh_add_found = ssh_add.is_ok();

    let agent_running = agent::is_running();
    let agent_identities = match ssh_add {
        Ok(ssh_add) if agent_running => agent::fetch_loaded_keys(ssh_add)
            .await
            .ok()
            .map(|lines| lines.len()),
        _ => None,
    };

    let result = CheckResult {
        config_exists,
        key_dir_exists,
        public_key_count,
        ssh_keygen_found,
        ssh_add_found,
        agent_running,
        agent_identities,
    };

    print_formatted(&result, format, |r| {
        let identities = r
            .agent_identities
            .map(|n| format!(" ({} identities)", n))
            .unwrap_or_default();

        [
            status_line(r.config_exists, "Config file exists"),
            status_line(
                r.key_dir_exists,
                &format!("Key directory exists ({} public keys)", r.public_key_count),
            ),
            status_line(r.ssh_keygen_found, "ssh-keygen found"),
            status_line(r.ssh_add_found, "ssh-add found"),
            status_line(r.agent_running, &format!("ssh-agent running{}", identities)),
        ]
        .join("\n")
    });

    Ok(())
}
