//! ssh-agent state
//!
//! The background task publishes transitions through a [`StateHandle`] and
//! wakes the UI itself, so the frame loop only reads snapshots.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ssh::agent;
use crate::state::{StateEvent, StateHandle};
use crate::state::status::{State, Status};
use crate::task::{PollResult, poll_task};

/// Agent-related state
pub struct AgentState {
    /// Loaded identities, one `ssh-add -l` line each
    handle: Arc<StateHandle<Vec<String>>>,
    /// Receiver used to report finished transitions in the status bar
    updates: watch::Receiver<State<Vec<String>>>,
    /// Whether SSH_AUTH_SOCK was set at the last refresh
    pub running: bool,
    /// Async task querying the agent
    task: Option<JoinHandle<()>>,
}

impl Default for AgentState {
    fn default() -> Self {
        let handle = Arc::new(StateHandle::new());
        let updates = handle.subscribe();
        Self {
            handle,
            updates,
            running: agent::is_running(),
            task: None,
        }
    }
}

impl AgentState {
    /// Snapshot of the current state
    pub fn snapshot(&self) -> State<Vec<String>> {
        self.handle.current()
    }

    /// Start listing loaded identities
    pub fn refresh(&mut self, ctx: &egui::Context, ssh_add: String) -> Option<StateEvent> {
        self.running = agent::is_running();
        if self.task.is_some() {
            return None;
        }

        if !self.running {
            // Identities of an agent that went away must not linger
            self.handle.reset();
            self.handle.apply(
                Status::Failed,
                Some("No ssh-agent running (SSH_AUTH_SOCK is not set)"),
                None,
            );
            return None;
        }

        self.handle.apply(Status::Loading, None, None);

        let handle = Arc::clone(&self.handle);
        let ctx = ctx.clone();
        self.task = Some(tokio::spawn(async move {
            match agent::fetch_loaded_keys(ssh_add).await {
                Ok(lines) => {
                    let message = format!("{} identities loaded", lines.len());
                    tracing::info!("ssh-agent: {}", message);
                    handle.apply(Status::Success, Some(&message), Some(lines));
                }
                Err(e) => {
                    tracing::error!("Failed to list agent identities: {}", e);
                    handle.apply(Status::Failed, Some(&e.to_string()), None);
                }
            }
            ctx.request_repaint();
        }));

        Some(StateEvent::StatusMessage("Querying ssh-agent...".to_string()))
    }

    /// Report settled transitions and reap the agent task
    pub fn poll(&mut self) -> Vec<StateEvent> {
        let mut events = Vec::new();

        if self.updates.has_changed().unwrap_or(false) {
            let state = self.updates.borrow_and_update().clone();
            if !state.is_loading() {
                if let Some(message) = state.message {
                    events.push(StateEvent::StatusMessage(message));
                }
            }
        }

        match poll_task(&mut self.task) {
            PollResult::Complete(Err(e)) => {
                let msg = format!("Task panicked: {}", e);
                events.push(StateEvent::LogError(msg.clone()));
                self.handle.apply(Status::Failed, Some(&msg), None);
            }
            PollResult::Complete(Ok(())) | PollResult::Pending | PollResult::NoTask => {}
        }

        events
    }
}
