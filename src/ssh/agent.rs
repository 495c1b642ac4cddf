//! ssh-agent queries

use std::collections::HashSet;
use std::process::Command;

use super::SshError;
use super::keygen::parse_fingerprint_line;

const AUTH_SOCK_VAR: &str = "SSH_AUTH_SOCK";

/// Printed by `ssh-add -l` (with exit code 1) when nothing is loaded
const NO_IDENTITIES: &str = "The agent has no identities.";

/// Whether an `SSH_AUTH_SOCK` value points at an agent
pub fn agent_socket_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Whether an ssh-agent is reachable from this process
pub fn is_running() -> bool {
    agent_socket_present(std::env::var(AUTH_SOCK_VAR).ok().as_deref())
}

/// Interpret the result of `ssh-add -l`
fn parse_list_output(success: bool, stdout: &str, stderr: &str) -> Result<Vec<String>, SshError> {
    if success {
        return Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect());
    }

    if stdout.contains(NO_IDENTITIES) || stderr.contains(NO_IDENTITIES) {
        return Ok(Vec::new());
    }

    let message = if stderr.trim().is_empty() { stdout } else { stderr };
    Err(SshError::Agent(message.trim().to_string()))
}

/// Lines of `ssh-add -l`, one per loaded identity
pub fn loaded_keys(ssh_add: &str) -> Result<Vec<String>, SshError> {
    let out = Command::new(ssh_add)
        .arg("-l")
        .output()
        .map_err(|source| SshError::Spawn {
            tool: format!("{} -l", ssh_add),
            source,
        })?;

    parse_list_output(
        out.status.success(),
        &String::from_utf8_lossy(&out.stdout),
        &String::from_utf8_lossy(&out.stderr),
    )
}

/// [`loaded_keys`] on the blocking pool
pub async fn fetch_loaded_keys(ssh_add: String) -> Result<Vec<String>, SshError> {
    tokio::task::spawn_blocking(move || loaded_keys(&ssh_add))
        .await
        .map_err(|_| SshError::Cancelled)?
}

/// Fingerprints listed in `ssh-add -l` output
pub fn loaded_fingerprints(lines: &[String]) -> HashSet<String> {
    lines
        .iter()
        .filter_map(|line| {
            parse_fingerprint_line(line)
                .map(|parsed| parsed.fingerprint)
                .or_else(|| line.split_whitespace().nth(1).map(str::to_string))
        })
        .filter(|fp| fp.starts_with("SHA256:") || fp.starts_with("MD5:"))
        .collect()
}
