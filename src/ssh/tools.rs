//! Resolution of the OpenSSH command-line tools.
//!
//! keydeck uses the OS-provided OpenSSH client. Bundled GUI apps can see a
//! different `PATH` than a terminal, so a configured path or an environment
//! override always wins over the `PATH` lookup.

use std::path::Path;

use super::SshError;

/// OpenSSH binaries keydeck shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    SshKeygen,
    SshAdd,
}

impl Tool {
    /// Program name looked up on `PATH`
    pub fn program(&self) -> &'static str {
        match self {
            Tool::SshKeygen => "ssh-keygen",
            Tool::SshAdd => "ssh-add",
        }
    }

    /// Environment variable that overrides the binary location
    pub fn env_var(&self) -> &'static str {
        match self {
            Tool::SshKeygen => "KEYDECK_SSH_KEYGEN",
            Tool::SshAdd => "KEYDECK_SSH_ADD",
        }
    }
}

/// Pick the first non-blank override, config before environment
fn pick_override(configured: Option<&str>, env_value: Option<&str>) -> Option<String> {
    [configured, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|p| !p.is_empty())
        .map(str::to_string)
}

/// Resolve the binary for `tool`.
///
/// Order: configured path, environment override, `PATH` lookup, then the
/// bare program name.
pub fn resolve(tool: Tool, configured: Option<&str>) -> String {
    let env_value = std::env::var(tool.env_var()).ok();
    if let Some(p) = pick_override(configured, env_value.as_deref()) {
        return p;
    }

    if let Ok(p) = which::which(tool.program()) {
        return p.to_string_lossy().to_string();
    }

    #[cfg(windows)]
    {
        if let Ok(root) = std::env::var("SystemRoot") {
            let openssh = Path::new(&root)
                .join("System32")
                .join("OpenSSH")
                .join(format!("{}.exe", tool.program()));
            if openssh.exists() {
                return openssh.to_string_lossy().to_string();
            }
        }
    }

    tool.program().to_string()
}

/// Resolve the binary for `tool`, failing if it cannot be found.
pub fn resolve_checked(tool: Tool, configured: Option<&str>) -> Result<String, SshError> {
    let p = resolve(tool, configured);

    let not_found = SshError::ToolNotFound {
        tool: tool.program(),
        env_var: tool.env_var(),
    };

    // Paths must exist; bare names must be on PATH
    if p.contains('/') || p.contains('\\') {
        return if Path::new(&p).exists() { Ok(p) } else { Err(not_found) };
    }

    if which::which(&p).is_ok() {
        Ok(p)
    } else {
        Err(not_found)
    }
}
