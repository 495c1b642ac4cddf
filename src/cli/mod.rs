//! CLI module for Keydeck
//!
//! Provides a command-line interface for all key and agent operations.
//! Running without a subcommand opens the desktop window instead.

mod commands;
mod output;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

/// Keydeck - OpenSSH key manager
#[derive(Parser, Debug)]
#[command(name = "keydeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Public key listing and removal
    Keys {
        #[command(subcommand)]
        command: commands::keys::KeysCommands,
    },

    /// ssh-agent status and identities
    Agent {
        #[command(subcommand)]
        command: commands::agent::AgentCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Diagnostics and debugging
    Diag {
        #[command(subcommand)]
        command: commands::diag::DiagCommands,
    },
}

/// Run a CLI command
pub async fn run(command: Commands, output: &OutputOptions) -> anyhow::Result<()> {
    let format = output.format();
    let quiet = output.quiet;

    match command {
        Commands::Keys { command } => commands::keys::run(command, format, quiet).await,
        Commands::Agent { command } => commands::agent::run(command, format, quiet).await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
        Commands::Diag { command } => commands::diag::run(command, format, quiet).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_gui() {
        let cli = Cli::try_parse_from(["keydeck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["keydeck", "keys", "list", "--json"]).unwrap();
        assert_eq!(cli.output.format(), OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Keys { .. })));
    }

    #[test]
    fn test_remove_requires_name() {
        assert!(Cli::try_parse_from(["keydeck", "keys", "remove"]).is_err());
        assert!(Cli::try_parse_from(["keydeck", "keys", "remove", "id_rsa", "--yes"]).is_ok());
    }
}
