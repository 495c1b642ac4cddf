//! Shared UI components

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, Vec2};

use crate::app::KeydeckApp;
use crate::state::{Payload, State, Status, Tab};
use crate::ui::theme::Theme;

/// Render a tab button
pub fn render_tab(app: &mut KeydeckApp, ui: &mut egui::Ui, tab: Tab) {
    let is_active = app.ui.active_tab == tab;

    let (bg, text_color) = if is_active {
        (app.theme.bg_medium, app.theme.accent)
    } else {
        (Color32::TRANSPARENT, app.theme.text_secondary)
    };

    let button = egui::Button::new(RichText::new(tab.label()).color(text_color))
        .fill(bg)
        .corner_radius(CornerRadius {
            nw: 6,
            ne: 6,
            sw: 0,
            se: 0,
        })
        .min_size(Vec2::new(80.0, 32.0));

    if ui.add(button).clicked() && !is_active {
        app.ui.active_tab = tab;

        // Agent listing is only fetched when first looked at
        if tab == Tab::Agent && app.agent.snapshot().status == Status::Idle {
            let ctx = ui.ctx().clone();
            app.refresh_agent(&ctx);
        }
    }
}

/// Framed section with an accent title
pub fn section_frame<R>(
    ui: &mut egui::Ui,
    theme: &Theme,
    title: &str,
    content: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(16))
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(ui)
        })
        .inner
}

/// One-line summary of an operation's [`State`]
pub fn render_state_line<T: Payload>(ui: &mut egui::Ui, theme: &Theme, state: &State<T>, loading_text: &str) {
    ui.horizontal(|ui| match state.status {
        Status::Loading => {
            ui.spinner();
            ui.label(RichText::new(loading_text).color(theme.text_muted));
        }
        Status::Failed => {
            let text = state.message().unwrap_or("Failed");
            ui.label(RichText::new(text).color(theme.error));
        }
        Status::Success => {
            if let Some(text) = state.message() {
                ui.label(RichText::new(text).color(theme.text_muted));
            }
        }
        Status::Idle => {}
    });
}

/// Small colored badge
pub fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.2))
        .corner_radius(CornerRadius::same(4))
        .inner_margin(Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).size(11.0));
        });
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut KeydeckApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = app.theme.clone();

    egui::Window::new("About Keydeck")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([280.0, 200.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("Keydeck").size(24.0).strong().color(theme.accent));
                ui.add_space(4.0);
                ui.label(RichText::new("OpenSSH key manager").size(14.0).color(theme.text_secondary));
                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );
                ui.add_space(12.0);
                ui.label(RichText::new("Built with Rust + egui").size(11.0).color(theme.text_muted));
                ui.add_space(12.0);

                if ui.button("Close").clicked() {
                    app.ui.show_about_dialog = false;
                }
                ui.add_space(8.0);
            });
        });
}
