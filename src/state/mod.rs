//! Application state modules
//!
//! `status` holds the operation lifecycle model every other state struct is
//! built on. The remaining modules group the fields each tab owns together
//! with their poll methods.

mod agent;
mod keys;
pub mod observed;
pub mod status;
mod ui;

pub use agent::AgentState;
pub use keys::KeysState;
pub use observed::StateHandle;
pub use status::{Payload, State, Status};
pub use ui::{Tab, UiState};

/// Events that state poll methods can return.
/// These communicate results back to KeydeckApp without direct mutation.
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Reload the key list
    RefreshKeys,

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
