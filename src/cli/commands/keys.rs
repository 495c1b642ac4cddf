//! Public key commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Subcommand;
use serde::Serialize;

use super::resolve_key_dir;
use crate::cli::output::{OutputFormat, print_formatted, report_state};
use crate::config::Config;
use crate::ssh::tools::{self, Tool};
use crate::ssh::{fingerprint, keygen};
use crate::state::{State, Status};
use crate::types::{Key, SshKeyInfo};

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// List public keys and whether they are loaded in the agent
    List {
        /// Key directory (uses configured directory or ~/.ssh if not specified)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Only show keys loaded in the agent
        #[arg(long)]
        active: bool,
    },

    /// Show raw `ssh-keygen -lv` output for every key
    Info {
        /// Key directory (uses configured directory or ~/.ssh if not specified)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print a public key (for pasting into a server or Git host)
    Show {
        /// Key name, with or without `.pub`
        name: String,

        /// Key directory (uses configured directory or ~/.ssh if not specified)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Delete a key pair (public and private key files)
    Remove {
        /// Key name, with or without `.pub`
        name: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,

        /// Key directory (uses configured directory or ~/.ssh if not specified)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// JSON-serializable key listing row
#[derive(Serialize)]
struct KeyRow {
    #[serde(flatten)]
    key: Key,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<DateTime<Local>>,
}

pub async fn run(command: KeysCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        KeysCommands::List { dir, active } => list(dir, active, format).await,
        KeysCommands::Info { dir } => info(dir, format).await,
        KeysCommands::Show { name, dir } => show(&name, dir, format).await,
        KeysCommands::Remove { name, yes, dir } => remove(&name, yes, dir, format, quiet).await,
    }
}

async fn list(dir: Option<PathBuf>, active_only: bool, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let key_dir = resolve_key_dir(dir, &config)?;
    let ssh_add = tools::resolve(Tool::SshAdd, config.tools.ssh_add.as_deref());

    let keys = keygen::load_keys(key_dir.clone(), ssh_add)
        .await
        .with_context(|| format!("Failed to list keys in {}", key_dir.display()))?;

    let rows: Vec<KeyRow> = keys
        .into_iter()
        .filter(|key| !active_only || key.is_active)
        .map(|key| KeyRow {
            modified: keygen::key_modified(&key_dir, &key.filename),
            key,
        })
        .collect();

    print_formatted(&rows, format, |rows| format_key_table(rows, &key_dir));
    Ok(())
}

fn format_key_table(rows: &[KeyRow], key_dir: &Path) -> String {
    if rows.is_empty() {
        return format!("No public keys found in {}", key_dir.display());
    }

    let name_width = rows.iter().map(|r| r.key.name().len()).max().unwrap_or(4).max(4);
    let mut lines = vec![format!(
        "  {:<name_width$}  {:<10}  {:<16}  {:<10}  COMMENT",
        "NAME", "TYPE", "FINGERPRINT", "MODIFIED"
    )];

    for row in rows {
        let marker = if row.key.is_active { "*" } else { " " };
        let modified = row
            .modified
            .map(|m| m.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{} {:<name_width$}  {:<10}  {:<16}  {:<10}  {}",
            marker,
            row.key.name(),
            row.key.key_type,
            row.key.short_fingerprint(),
            modified,
            row.key.email
        ));
    }

    let active = rows.iter().filter(|r| r.key.is_active).count();
    lines.push(String::new());
    lines.push(format!("{} keys, {} loaded in agent (*)", rows.len(), active));
    lines.join("\n")
}

async fn info(dir: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let key_dir = resolve_key_dir(dir, &config)?;
    let ssh_keygen = tools::resolve_checked(Tool::SshKeygen, config.tools.ssh_keygen.as_deref())?;

    let infos = keygen::describe(ssh_keygen, key_dir.clone()).await?;

    print_formatted(&infos, format, |infos: &Vec<SshKeyInfo>| {
        if infos.is_empty() {
            return format!("No public keys found in {}", key_dir.display());
        }
        infos
            .iter()
            .map(|info| format!("== {}\n{}", info.filename, info.key_info.trim_end()))
            .collect::<Vec<_>>()
            .join("\n\n")
    });
    Ok(())
}

#[derive(Serialize)]
struct ShowResult {
    filename: String,
    fingerprint: String,
    public_key: String,
}

async fn show(name: &str, dir: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let key_dir = resolve_key_dir(dir, &config)?;
    let filename = keygen::normalize_key_filename(name);

    let public_key = keygen::public_key_line(&key_dir, &filename)?;
    let result = ShowResult {
        fingerprint: fingerprint::sha256(&public_key)?,
        filename,
        public_key,
    };

    print_formatted(&result, format, |r| r.public_key.clone());
    Ok(())
}

async fn remove(
    name: &str,
    yes: bool,
    dir: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let config = Config::load()?;
    let key_dir = resolve_key_dir(dir, &config)?;
    let filename = keygen::normalize_key_filename(name);

    if !yes {
        anyhow::bail!(
            "Refusing to delete {} without --yes (this removes the private key too)",
            key_dir.join(&filename).display()
        );
    }

    let mut state: State<String> = State::idle();
    state.apply(Status::Loading, None, None);

    let target = filename.clone();
    let outcome = tokio::task::spawn_blocking(move || keygen::remove_key_pair(&key_dir, &target))
        .await
        .context("Removal task failed")?;

    match outcome {
        Ok(removed) => {
            let message = format!("Removed {} ({} files)", filename, removed.len());
            state.apply(Status::Success, Some(&message), Some(filename));
        }
        Err(e) => state.apply(Status::Failed, Some(&e.to_string()), None),
    }

    report_state(&state, format, quiet)
}
