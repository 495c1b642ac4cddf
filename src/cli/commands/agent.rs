//! ssh-agent commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted, report_state, status_line};
use crate::config::Config;
use crate::ssh::agent;
use crate::ssh::tools::{self, Tool};
use crate::state::{State, Status};

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Show whether an ssh-agent is reachable
    Status,

    /// List identities loaded in the agent (`ssh-add -l`)
    List,
}

#[derive(Serialize)]
struct AgentStatusResult {
    running: bool,
    socket: Option<String>,
}

pub async fn run(command: AgentCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        AgentCommands::Status => status(format).await,
        AgentCommands::List => list(format, quiet).await,
    }
}

async fn status(format: OutputFormat) -> Result<()> {
    let socket = std::env::var("SSH_AUTH_SOCK").ok();
    let result = AgentStatusResult {
        running: agent::agent_socket_present(socket.as_deref()),
        socket,
    };

    print_formatted(&result, format, |r| match (&r.socket, r.running) {
        (Some(socket), true) => status_line(true, &format!("ssh-agent running ({})", socket)),
        _ => status_line(false, "ssh-agent running (SSH_AUTH_SOCK is not set)"),
    });
    Ok(())
}

async fn list(format: OutputFormat, quiet: bool) -> Result<()> {
    let config = Config::load()?;
    let mut state: State<Vec<String>> = State::idle();

    if !agent::is_running() {
        state.apply(
            Status::Failed,
            Some("No ssh-agent running (SSH_AUTH_SOCK is not set)"),
            None,
        );
        return report_state(&state, format, quiet);
    }

    state.apply(Status::Loading, Some("Querying ssh-agent"), None);
    let ssh_add = tools::resolve(Tool::SshAdd, config.tools.ssh_add.as_deref());

    match agent::fetch_loaded_keys(ssh_add).await {
        Ok(lines) => {
            let message = identities_message(lines.len());
            state.apply(Status::Success, Some(&message), Some(lines));
        }
        Err(e) => state.apply(Status::Failed, Some(&e.to_string()), None),
    }

    if format == OutputFormat::Text && state.status == Status::Success {
        for line in state.data.iter().flatten() {
            println!("{}", line);
        }
    }

    report_state(&state, format, quiet)
}

fn identities_message(count: usize) -> String {
    match count {
        0 => "The agent has no identities".to_string(),
        1 => "1 identity loaded".to_string(),
        n => format!("{} identities loaded", n),
    }
}
