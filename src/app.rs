use eframe::egui::{self, RichText};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::ssh::tools::{self, Tool};
use crate::ssh::{SshError, keygen};
use crate::state::{AgentState, KeysState, StateEvent, Status, Tab, UiState};
use crate::ui::components::{render_about_dialog, render_tab};
use crate::ui::theme::Theme;
use crate::ui::{render_agent_tab, render_keys_tab, render_settings_tab};

/// Main application state
pub struct KeydeckApp {
    /// Application configuration
    pub config: Config,
    /// Current theme colors
    pub theme: Theme,
    /// Navigation and status bar
    pub ui: UiState,
    /// Key list
    pub keys: KeysState,
    /// ssh-agent identities
    pub agent: AgentState,
}

impl KeydeckApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            tracing::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        });
        let theme = Theme::from_config(config.ui.dark_theme);

        let mut app = Self {
            config,
            theme,
            ui: UiState::default(),
            keys: KeysState::default(),
            agent: AgentState::default(),
        };

        // Load keys on startup; agent state is needed for the "loaded" badges
        app.refresh_keys();
        app.refresh_agent(&cc.egui_ctx);

        app
    }

    /// Key directory from config or ~/.ssh
    pub fn key_dir(&self) -> Result<PathBuf, SshError> {
        keygen::ssh_dir(self.config.key_dir_override())
    }

    fn ssh_add(&self) -> String {
        tools::resolve(Tool::SshAdd, self.config.tools.ssh_add.as_deref())
    }

    /// Reload the key list
    pub fn refresh_keys(&mut self) {
        match self.key_dir() {
            Ok(dir) => {
                let ssh_add = self.ssh_add();
                let event = self.keys.refresh(dir, ssh_add);
                self.handle_events(event);
            }
            Err(e) => {
                tracing::error!("Cannot determine key directory: {}", e);
                self.keys.list.apply(Status::Failed, Some(&e.to_string()), None);
            }
        }
    }

    /// Re-query the agent
    pub fn refresh_agent(&mut self, ctx: &egui::Context) {
        let ssh_add = self.ssh_add();
        let event = self.agent.refresh(ctx, ssh_add);
        self.handle_events(event);
    }

    /// Remove a confirmed key pair
    pub fn remove_key(&mut self, filename: &str) {
        match self.key_dir() {
            Ok(dir) => {
                let event = self.keys.confirm_remove(&dir, filename);
                self.handle_events(event);
            }
            Err(e) => {
                self.keys.removal.apply(Status::Failed, Some(&e.to_string()), None);
            }
        }
    }

    /// Open directory picker for the key directory.
    /// Returns true if the directory changed.
    pub fn browse_for_key_dir(&mut self) -> bool {
        let mut dialog = rfd::FileDialog::new().set_title("Select SSH Key Directory");
        if let Ok(dir) = self.key_dir() {
            dialog = dialog.set_directory(dir);
        }

        match dialog.pick_folder() {
            Some(path) => {
                self.config.keys.directory = Some(path.to_string_lossy().to_string());
                true
            }
            None => false,
        }
    }

    /// Show the key directory in the system file manager
    pub fn open_key_dir(&mut self) {
        let result = self
            .key_dir()
            .map_err(anyhow::Error::from)
            .and_then(|dir| open::that(&dir).map_err(anyhow::Error::from));

        if let Err(e) = result {
            tracing::error!("Failed to open key directory: {}", e);
            self.ui.status_message = format!("Failed to open key directory: {}", e);
        }
    }

    pub fn set_theme(&mut self, dark: bool) {
        self.theme = Theme::from_config(dark);
        self.ui.theme_dirty = true;
    }

    /// Save configuration to disk
    pub fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Apply events returned by state poll methods
    pub fn handle_events(&mut self, events: impl IntoIterator<Item = StateEvent>) {
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.ui.status_message = msg,
                StateEvent::RefreshKeys => self.refresh_keys(),
                StateEvent::LogError(msg) => tracing::error!("{}", msg),
                StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
            }
        }
    }

    fn poll_tasks(&mut self, ctx: &egui::Context) {
        let events = self.keys.poll(ctx);
        self.handle_events(events);
        let events = self.agent.poll();
        self.handle_events(events);

        let ttl = Duration::from_millis(self.config.ui.trigger_reset_ms);
        self.keys.expire_triggers(Instant::now(), ttl);
        if self.keys.has_copy_feedback() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl eframe::App for KeydeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        self.poll_tasks(ctx);

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for tab in Tab::all() {
                    render_tab(self, ui, *tab);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("About").clicked() {
                        self.ui.show_about_dialog = true;
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&self.ui.status_message).color(self.theme.text_secondary));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.ui.active_tab {
            Tab::Keys => render_keys_tab(self, ui),
            Tab::Agent => render_agent_tab(self, ui),
            Tab::Settings => render_settings_tab(self, ui),
        });

        render_about_dialog(self, ctx);
    }
}
