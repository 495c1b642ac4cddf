//! Keys tab UI rendering

use eframe::egui::{self, CornerRadius, Margin, RichText};

use crate::app::KeydeckApp;
use crate::state::Status;
use crate::types::Key;
use crate::ui::components::{badge, render_state_line, section_frame};
use crate::ui::theme::Theme;

/// Something the user clicked on a key card
enum KeyAction {
    Select(usize),
    Copy(usize),
    RequestRemove(String),
    ConfirmRemove(String),
    CancelRemove(String),
}

/// Render the keys tab
pub fn render_keys_tab(app: &mut KeydeckApp, ui: &mut egui::Ui) {
    let theme = app.theme.clone();

    ui.label(RichText::new("Keys").color(theme.text_primary).size(20.0).strong());
    ui.add_space(16.0);

    section_frame(ui, &theme, "Key Directory", |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Directory:").color(theme.text_muted));
            let dir_text = match app.key_dir() {
                Ok(dir) => dir.display().to_string(),
                Err(e) => e.to_string(),
            };
            ui.label(RichText::new(dir_text).color(theme.text_primary));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Open folder").clicked() {
                    app.open_key_dir();
                }
                let refresh = egui::Button::new("Refresh");
                if ui.add_enabled(!app.keys.list.is_loading(), refresh).clicked() {
                    app.refresh_keys();
                }
            });
        });

        ui.add_space(4.0);
        render_state_line(ui, &theme, &app.keys.list, "Loading keys...");
        if app.keys.removal.status == Status::Failed {
            render_state_line(ui, &theme, &app.keys.removal, "");
        }
    });

    ui.add_space(12.0);

    let show_inactive = app.config.keys.show_inactive;
    let mut actions = Vec::new();

    let visible = app.keys.visible_keys(show_inactive);
    if visible.is_empty() && app.keys.list.status == Status::Success {
        let text = if show_inactive {
            "No public keys found."
        } else {
            "No keys are loaded in the agent."
        };
        ui.label(RichText::new(text).color(theme.text_muted));
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("keys_scroll")
        .show(ui, |ui| {
            for (idx, key) in visible {
                let selected = app.keys.selected_idx == Some(idx);
                let trigger = app.keys.trigger(&key.filename);
                let removing = app.keys.removal.is_loading();
                render_key_card(ui, &theme, idx, key, selected, trigger, removing, &mut actions);
                ui.add_space(8.0);
            }
        });

    for action in actions {
        match action {
            KeyAction::Select(idx) => app.keys.selected_idx = Some(idx),
            KeyAction::Copy(idx) => {
                let ctx = ui.ctx().clone();
                let event = app.keys.copy_public_key(&ctx, idx);
                app.handle_events(event);
            }
            KeyAction::RequestRemove(name) => app.keys.request_remove(&name),
            KeyAction::CancelRemove(name) => app.keys.cancel_remove(&name),
            KeyAction::ConfirmRemove(name) => app.remove_key(&name),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_key_card(
    ui: &mut egui::Ui,
    theme: &Theme,
    idx: usize,
    key: &Key,
    selected: bool,
    trigger: crate::types::KeyMenuTrigger,
    removing: bool,
    actions: &mut Vec<KeyAction>,
) {
    let border = if selected { theme.accent } else { theme.border };

    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::same(12))
        .stroke(egui::Stroke::new(1.0, border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                let title = RichText::new(key.name()).color(theme.text_primary).strong();
                if ui.add(egui::Label::new(title).sense(egui::Sense::click())).clicked() {
                    actions.push(KeyAction::Select(idx));
                }
                badge(ui, &key.key_type, theme.text_secondary);
                if key.is_active {
                    badge(ui, "loaded", theme.success);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if trigger.remove {
                        if ui.button("Cancel").clicked() {
                            actions.push(KeyAction::CancelRemove(key.filename.clone()));
                        }
                        let confirm = egui::Button::new(RichText::new("Confirm remove").color(theme.error));
                        if ui.add_enabled(!removing, confirm).clicked() {
                            actions.push(KeyAction::ConfirmRemove(key.filename.clone()));
                        }
                    } else {
                        if ui.button("Remove").clicked() {
                            actions.push(KeyAction::RequestRemove(key.filename.clone()));
                        }
                        let copy_label = if trigger.copy { "Copied!" } else { "Copy" };
                        if ui.button(copy_label).clicked() {
                            actions.push(KeyAction::Copy(idx));
                        }
                    }
                });
            });

            if !key.email.is_empty() {
                ui.label(RichText::new(&key.email).color(theme.text_secondary));
            }
            ui.label(RichText::new(&key.key_pid).monospace().size(11.0).color(theme.text_muted));

            if trigger.remove {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!(
                        "This deletes {} and its private key from disk.",
                        key.filename
                    ))
                    .color(theme.warning),
                );
            }
        });
}
