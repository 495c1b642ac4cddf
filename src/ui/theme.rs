use eframe::egui::{self, Color32, Stroke, Visuals};

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    pub dark: bool,

    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub border: Color32,
}

impl Theme {
    pub fn from_config(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    /// Slate background with a teal accent
    pub fn dark() -> Self {
        Self {
            dark: true,

            bg_darkest: Color32::from_rgb(15, 17, 21),
            bg_dark: Color32::from_rgb(22, 25, 31),
            bg_medium: Color32::from_rgb(31, 35, 43),
            bg_light: Color32::from_rgb(45, 51, 62),

            text_primary: Color32::from_rgb(236, 239, 244),
            text_secondary: Color32::from_rgb(196, 202, 212),
            text_muted: Color32::from_rgb(134, 142, 156),

            accent: Color32::from_rgb(45, 212, 191),      // Teal-400
            accent_muted: Color32::from_rgb(17, 148, 136), // Teal-600

            success: Color32::from_rgb(34, 197, 94),
            warning: Color32::from_rgb(234, 179, 8),
            error: Color32::from_rgb(239, 68, 68),

            border: Color32::from_rgb(58, 64, 77),
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,

            bg_darkest: Color32::from_rgb(255, 255, 255),
            bg_dark: Color32::from_rgb(246, 247, 249),
            bg_medium: Color32::from_rgb(236, 238, 242),
            bg_light: Color32::from_rgb(222, 226, 232),

            text_primary: Color32::from_rgb(24, 27, 33),
            text_secondary: Color32::from_rgb(60, 66, 78),
            text_muted: Color32::from_rgb(110, 117, 130),

            accent: Color32::from_rgb(13, 148, 136),
            accent_muted: Color32::from_rgb(94, 196, 186),

            success: Color32::from_rgb(22, 163, 74),
            warning: Color32::from_rgb(202, 138, 4),
            error: Color32::from_rgb(220, 38, 38),

            border: Color32::from_rgb(203, 208, 217),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.dark { Visuals::dark() } else { Visuals::light() };

        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);

        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent);

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;

        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
