//! Settings tab UI rendering

use eframe::egui::{self, RichText};

use crate::app::KeydeckApp;
use crate::config::Config;
use crate::ui::components::section_frame;

/// Edit an optional path; empty text means "not set"
fn optional_path_row(ui: &mut egui::Ui, label: &str, hint: &str, value: &mut Option<String>) -> bool {
    let mut text = value.clone().unwrap_or_default();
    let mut commit = false;

    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.add(egui::TextEdit::singleline(&mut text).hint_text(hint).desired_width(320.0));
        if response.changed() {
            *value = (!text.is_empty()).then(|| text.clone());
        }
        commit = response.lost_focus();
    });

    commit
}

/// Render the settings tab
pub fn render_settings_tab(app: &mut KeydeckApp, ui: &mut egui::Ui) {
    let theme = app.theme.clone();

    egui::ScrollArea::vertical()
        .id_salt("settings_scroll")
        .show(ui, |ui| {
            ui.label(RichText::new("Settings").color(theme.text_primary).size(20.0).strong());
            ui.add_space(16.0);

            section_frame(ui, &theme, "Keys", |ui| {
                let mut reload = optional_path_row(
                    ui,
                    "Key directory:",
                    "~/.ssh",
                    &mut app.config.keys.directory,
                );

                ui.horizontal(|ui| {
                    if ui.button("Browse...").clicked() {
                        reload |= app.browse_for_key_dir();
                    }
                    if ui.button("Use default").clicked() {
                        app.config.keys.directory = None;
                        reload = true;
                    }
                });

                if ui
                    .checkbox(&mut app.config.keys.show_inactive, "Show keys not loaded in the agent")
                    .changed()
                {
                    app.save_config();
                }

                if reload {
                    app.save_config();
                    app.keys.clear();
                    app.refresh_keys();
                }
            });

            ui.add_space(12.0);

            section_frame(ui, &theme, "OpenSSH tools", |ui| {
                let mut commit = optional_path_row(
                    ui,
                    "ssh-keygen:",
                    "found on PATH",
                    &mut app.config.tools.ssh_keygen,
                );
                commit |= optional_path_row(ui, "ssh-add:", "found on PATH", &mut app.config.tools.ssh_add);
                if commit {
                    app.save_config();
                }
            });

            ui.add_space(12.0);

            section_frame(ui, &theme, "Appearance", |ui| {
                if ui.checkbox(&mut app.config.ui.dark_theme, "Dark theme").changed() {
                    app.set_theme(app.config.ui.dark_theme);
                    app.save_config();
                }

                ui.horizontal(|ui| {
                    ui.label("Copy feedback duration:");
                    let drag = egui::DragValue::new(&mut app.config.ui.trigger_reset_ms)
                        .range(100..=10_000)
                        .suffix(" ms");
                    let response = ui.add(drag);
                    if response.drag_stopped() || response.lost_focus() {
                        app.save_config();
                    }
                });
            });

            ui.add_space(12.0);

            let path_text = Config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|e| e.to_string());
            ui.label(RichText::new(format!("Config file: {}", path_text)).size(11.0).color(theme.text_muted));
        });
}
