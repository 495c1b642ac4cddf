//! UI modules for Keydeck
//!
//! This module contains the UI rendering code, organized by tab.

mod agent_tab;
pub mod components;
mod keys_tab;
mod settings_tab;
pub mod theme;

pub use agent_tab::render_agent_tab;
pub use keys_tab::render_keys_tab;
pub use settings_tab::render_settings_tab;
