//! Agent tab UI rendering

use eframe::egui::{self, RichText};

use crate::app::KeydeckApp;
use crate::state::Status;
use crate::ui::components::{badge, render_state_line, section_frame};

/// Render the agent tab
pub fn render_agent_tab(app: &mut KeydeckApp, ui: &mut egui::Ui) {
    let theme = app.theme.clone();
    let snapshot = app.agent.snapshot();

    ui.label(RichText::new("ssh-agent").color(theme.text_primary).size(20.0).strong());
    ui.add_space(16.0);

    section_frame(ui, &theme, "Status", |ui| {
        ui.horizontal(|ui| {
            if app.agent.running {
                badge(ui, "running", theme.success);
            } else {
                badge(ui, "not running", theme.warning);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let refresh = egui::Button::new("Refresh");
                if ui.add_enabled(!snapshot.is_loading(), refresh).clicked() {
                    let ctx = ui.ctx().clone();
                    app.refresh_agent(&ctx);
                }
            });
        });

        ui.add_space(4.0);
        render_state_line(ui, &theme, &snapshot, "Querying ssh-agent...");
    });

    ui.add_space(12.0);

    let identities = snapshot.data.as_deref().unwrap_or(&[]);
    if identities.is_empty() {
        if snapshot.status == Status::Success {
            ui.label(RichText::new("The agent has no identities.").color(theme.text_muted));
        }
        return;
    }

    section_frame(ui, &theme, "Loaded identities", |ui| {
        egui::ScrollArea::vertical()
            .id_salt("agent_scroll")
            .show(ui, |ui| {
                for line in identities {
                    ui.label(RichText::new(line).monospace().color(theme.text_secondary));
                }
            });
    });
}
