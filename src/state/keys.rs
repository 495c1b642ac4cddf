//! Key list state: loading, copy feedback and removal

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::task::JoinHandle;

use crate::ssh::{SshError, keygen};
use crate::state::StateEvent;
use crate::state::status::{State, Status};
use crate::task::{PollResult, poll_task};
use crate::types::{Key, KeyMenuTrigger};

/// Key list state
pub struct KeysState {
    /// Loaded keys and the status of the last load
    pub list: State<Vec<Key>>,
    /// Status of the last removal; data is the removed file name
    pub removal: State<String>,
    /// Index of selected key in the list
    pub selected_idx: Option<usize>,
    /// Menu feedback per key file name
    triggers: HashMap<String, KeyMenuTrigger>,
    /// When each copy trigger was raised
    copied_at: HashMap<String, Instant>,
    /// Async task loading the key list
    task: Option<JoinHandle<Result<Vec<Key>, SshError>>>,
    /// Async task removing a key pair
    remove_task: Option<JoinHandle<Result<Vec<PathBuf>, SshError>>>,
    /// File name being removed
    removing: Option<String>,
}

impl Default for KeysState {
    fn default() -> Self {
        Self {
            list: State::idle(),
            removal: State::idle(),
            selected_idx: None,
            triggers: HashMap::new(),
            copied_at: HashMap::new(),
            task: None,
            remove_task: None,
            removing: None,
        }
    }
}

impl KeysState {
    /// Keys from the last successful load
    pub fn keys(&self) -> &[Key] {
        self.list.data.as_deref().unwrap_or(&[])
    }

    /// Keys to display, with their index in [`Self::keys`]
    pub fn visible_keys(&self, show_inactive: bool) -> Vec<(usize, &Key)> {
        self.keys()
            .iter()
            .enumerate()
            .filter(|(_, key)| show_inactive || key.is_active)
            .collect()
    }

    /// Drop the loaded keys, e.g. after the key directory changed
    pub fn clear(&mut self) {
        self.list.reset();
        self.selected_idx = None;
        self.triggers.clear();
        self.copied_at.clear();
        self.task = None;
    }

    /// Check if a load or removal is running
    pub fn is_busy(&self) -> bool {
        self.list.is_loading() || self.removal.is_loading()
    }

    /// Menu feedback for a key
    pub fn trigger(&self, filename: &str) -> KeyMenuTrigger {
        self.triggers.get(filename).copied().unwrap_or_default()
    }

    /// Start loading keys from `dir`
    pub fn refresh(&mut self, dir: PathBuf, ssh_add: String) -> Option<StateEvent> {
        if self.list.is_loading() {
            return None;
        }

        self.list.apply(Status::Loading, None, None);
        let message = format!("Loading keys from {}...", dir.display());
        self.task = Some(tokio::spawn(keygen::load_keys(dir, ssh_add)));

        Some(StateEvent::StatusMessage(message))
    }

    /// Copy the public key at `idx` to the clipboard
    pub fn copy_public_key(&mut self, ctx: &egui::Context, idx: usize) -> Option<StateEvent> {
        let key = self.keys().get(idx)?;
        let filename = key.filename.clone();
        ctx.copy_text(key.public_key.clone());

        self.triggers.entry(filename.clone()).or_default().copy = true;
        self.copied_at.insert(filename.clone(), Instant::now());

        Some(StateEvent::StatusMessage(format!("Copied {} to clipboard", filename)))
    }

    /// Ask for confirmation before removing a key
    pub fn request_remove(&mut self, filename: &str) {
        self.triggers.entry(filename.to_string()).or_default().remove = true;
    }

    /// Dismiss a pending removal confirmation
    pub fn cancel_remove(&mut self, filename: &str) {
        if let Some(trigger) = self.triggers.get_mut(filename) {
            trigger.remove = false;
        }
    }

    /// Remove a key pair after confirmation
    pub fn confirm_remove(&mut self, dir: &Path, filename: &str) -> Option<StateEvent> {
        if self.removal.is_loading() || !self.trigger(filename).remove {
            return None;
        }

        self.removal.apply(Status::Loading, None, None);
        self.removing = Some(filename.to_string());

        let dir = dir.to_path_buf();
        let name = filename.to_string();
        self.remove_task = Some(tokio::task::spawn_blocking(move || {
            keygen::remove_key_pair(&dir, &name)
        }));

        Some(StateEvent::StatusMessage(format!("Removing {}...", filename)))
    }

    /// Whether any "copied" feedback is still showing
    pub fn has_copy_feedback(&self) -> bool {
        !self.copied_at.is_empty()
    }

    /// Lower copy triggers older than `ttl`
    pub fn expire_triggers(&mut self, now: Instant, ttl: Duration) {
        let expired: Vec<String> = self
            .copied_at
            .iter()
            .filter(|(_, raised)| now.saturating_duration_since(**raised) >= ttl)
            .map(|(name, _)| name.clone())
            .collect();

        for name in expired {
            self.copied_at.remove(&name);
            if let Some(trigger) = self.triggers.get_mut(&name) {
                trigger.copy = false;
            }
        }
        self.triggers.retain(|_, t| t.is_raised());
    }

    /// Poll the async tasks for completion
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();
        self.poll_list(ctx, &mut events);
        self.poll_removal(ctx, &mut events);
        events
    }

    fn poll_list(&mut self, ctx: &egui::Context, events: &mut Vec<StateEvent>) {
        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(keys))) => {
                let count = keys.len();
                let active = keys.iter().filter(|k| k.is_active).count();
                let message = format!("Found {} keys ({} loaded in agent)", count, active);

                if self.selected_idx.is_some_and(|i| i >= count) {
                    self.selected_idx = None;
                }
                self.list.apply(Status::Success, Some(&message), Some(keys));
                events.push(StateEvent::LogInfo(message.clone()));
                events.push(StateEvent::StatusMessage(message));
            }
            PollResult::Complete(Ok(Err(e))) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Failed to load keys: {}", msg)));
                events.push(StateEvent::StatusMessage(format!("Error: {}", msg)));
                self.list.apply(Status::Failed, Some(&msg), None);
            }
            PollResult::Complete(Err(e)) => {
                let msg = format!("Task panicked: {}", e);
                events.push(StateEvent::LogError(msg.clone()));
                self.list.apply(Status::Failed, Some(&msg), None);
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }
    }

    fn poll_removal(&mut self, ctx: &egui::Context, events: &mut Vec<StateEvent>) {
        match poll_task(&mut self.remove_task) {
            PollResult::Complete(Ok(Ok(removed))) => {
                let name = self.removing.take().unwrap_or_default();
                self.triggers.remove(&name);
                self.copied_at.remove(&name);
                self.selected_idx = None;

                let message = format!("Removed {} ({} files)", name, removed.len());
                self.removal.apply(Status::Success, Some(&message), Some(name));
                events.push(StateEvent::LogInfo(message.clone()));
                events.push(StateEvent::StatusMessage(message));
                events.push(StateEvent::RefreshKeys);
            }
            PollResult::Complete(Ok(Err(e))) => {
                let name = self.removing.take().unwrap_or_default();
                self.cancel_remove(&name);
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Failed to remove {}: {}", name, msg)));
                events.push(StateEvent::StatusMessage(format!("Error: {}", msg)));
                self.removal.apply(Status::Failed, Some(&msg), None);
            }
            PollResult::Complete(Err(e)) => {
                self.removing.take();
                let msg = format!("Task panicked: {}", e);
                events.push(StateEvent::LogError(msg.clone()));
                self.removal.apply(Status::Failed, Some(&msg), None);
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ED25519_LINE: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIMZwp7cmjwuXXCcHxTVCe+wYns3vHFKsGg2pA3+JJwnw alice@example.com";

    fn key_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("id_ed25519.pub"), ED25519_LINE).unwrap();
        fs::write(dir.path().join("id_ed25519"), "private").unwrap();
        dir
    }

    async fn settle(state: &mut KeysState, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();
        for _ in 0..500 {
            events.extend(state.poll(ctx));
            if !state.is_busy() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        events
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_loads_keys() {
        let dir = key_dir();
        let ctx = egui::Context::default();
        let mut state = KeysState::default();

        assert!(state.refresh(dir.path().to_path_buf(), "/nonexistent/ssh-add".into()).is_some());
        assert_eq!(state.list.status, Status::Loading);
        // A second refresh while loading is ignored
        assert!(state.refresh(dir.path().to_path_buf(), "/nonexistent/ssh-add".into()).is_none());

        settle(&mut state, &ctx).await;
        assert_eq!(state.list.status, Status::Success);
        assert_eq!(state.keys().len(), 1);
        assert_eq!(state.keys()[0].filename, "id_ed25519.pub");
        assert!(state.list.message().unwrap().starts_with("Found 1 keys"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_refresh_keeps_previous_keys() {
        let dir = key_dir();
        let ctx = egui::Context::default();
        let mut state = KeysState::default();

        state.refresh(dir.path().to_path_buf(), String::new());
        settle(&mut state, &ctx).await;
        assert_eq!(state.keys().len(), 1);

        state.refresh(dir.path().join("missing"), String::new());
        settle(&mut state, &ctx).await;
        assert_eq!(state.list.status, Status::Failed);
        assert!(state.list.message().unwrap().contains("Could not read directory"));
        // Data is sticky across the failed load
        assert_eq!(state.keys().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_requires_confirmation() {
        let dir = key_dir();
        let ctx = egui::Context::default();
        let mut state = KeysState::default();

        assert!(state.confirm_remove(dir.path(), "id_ed25519.pub").is_none());

        state.request_remove("id_ed25519.pub");
        assert!(state.trigger("id_ed25519.pub").remove);
        assert!(state.confirm_remove(dir.path(), "id_ed25519.pub").is_some());

        let events = settle(&mut state, &ctx).await;
        assert_eq!(state.removal.status, Status::Success);
        assert_eq!(state.removal.data.as_deref(), Some("id_ed25519.pub"));
        assert!(!state.trigger("id_ed25519.pub").is_raised());
        assert!(events.iter().any(|e| matches!(e, StateEvent::RefreshKeys)));
        assert!(!dir.path().join("id_ed25519.pub").exists());
        assert!(!dir.path().join("id_ed25519").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_removal_lowers_trigger() {
        let dir = key_dir();
        let ctx = egui::Context::default();
        let mut state = KeysState::default();

        state.request_remove("other.pub");
        state.confirm_remove(dir.path(), "other.pub");
        settle(&mut state, &ctx).await;

        assert_eq!(state.removal.status, Status::Failed);
        assert_eq!(state.removal.message(), Some("Key not found: other.pub"));
        assert!(!state.trigger("other.pub").remove);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_copy_trigger_expires() {
        let dir = key_dir();
        let ctx = egui::Context::default();
        let mut state = KeysState::default();
        state.refresh(dir.path().to_path_buf(), String::new());
        settle(&mut state, &ctx).await;

        assert!(state.copy_public_key(&ctx, 0).is_some());
        assert!(state.copy_public_key(&ctx, 5).is_none());
        assert!(state.trigger("id_ed25519.pub").copy);
        assert!(state.has_copy_feedback());

        let ttl = Duration::from_millis(1500);
        state.expire_triggers(Instant::now(), ttl);
        assert!(state.trigger("id_ed25519.pub").copy);

        state.request_remove("id_ed25519.pub");
        state.expire_triggers(Instant::now() + ttl, ttl);
        assert!(!state.trigger("id_ed25519.pub").copy);
        assert!(!state.has_copy_feedback());
        // Removal confirmation waits for the user, not the timer
        assert!(state.trigger("id_ed25519.pub").remove);
    }

    #[test]
    fn test_visible_keys_filter() {
        let mut state = KeysState::default();
        let key = |name: &str, active: bool| Key {
            key_pid: format!("SHA256:{}", name),
            public_key: String::new(),
            email: String::new(),
            is_active: active,
            key_type: "ED25519".to_string(),
            filename: format!("{}.pub", name),
        };
        state.list.apply(Status::Success, None, Some(vec![key("a", false), key("b", true)]));

        assert_eq!(state.visible_keys(true).len(), 2);
        let only_active = state.visible_keys(false);
        assert_eq!(only_active.len(), 1);
        assert_eq!(only_active[0].0, 1);

        state.selected_idx = Some(1);
        state.clear();
        assert_eq!(state.list.status, Status::Idle);
        assert!(state.keys().is_empty());
        assert_eq!(state.selected_idx, None);
    }
}
