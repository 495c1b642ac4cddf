//! UI-related application state

/// Application tabs representing the main navigation sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Keys tab: key list, copy and remove actions
    #[default]
    Keys,
    /// Agent tab: identities loaded in ssh-agent
    Agent,
    /// Settings tab: key directory, tool paths, appearance
    Settings,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Keys, Tab::Agent, Tab::Settings]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Keys => "Keys",
            Tab::Agent => "Agent",
            Tab::Settings => "Settings",
        }
    }
}

/// UI-related state
pub struct UiState {
    /// Currently selected tab
    pub active_tab: Tab,
    /// Status bar text
    pub status_message: String,
    /// Whether the theme needs to be applied
    pub theme_dirty: bool,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            status_message: "Ready".to_string(),
            theme_dirty: true, // Apply theme on first frame
            show_about_dialog: false,
        }
    }
}
