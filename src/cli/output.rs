//! Output formatting utilities for CLI

use anyhow::Result;
use serde::Serialize;

use crate::state::{State, Status};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a serializable value as JSON or use custom text formatter
pub fn print_formatted<T, F>(value: &T, format: OutputFormat, text_formatter: F)
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Text => println!("{}", text_formatter(value)),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a success message (suppressed in quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

/// Format a status line with a check mark or blank
pub fn status_line(ok: bool, message: &str) -> String {
    if ok {
        format!("[OK] {}", message)
    } else {
        format!("[  ] {}", message)
    }
}

/// Report the outcome of an operation tracked by a [`State`].
///
/// JSON output is the state itself; text output is its message. A failed
/// state becomes an error so the process exits non-zero.
pub fn report_state<T: Serialize>(state: &State<T>, format: OutputFormat, quiet: bool) -> Result<()> {
    match format {
        OutputFormat::Json => print_formatted(state, format, |_| String::new()),
        OutputFormat::Text => {
            if state.status != Status::Failed {
                if let Some(message) = state.message() {
                    print_success(message, quiet);
                }
            }
        }
    }

    if state.status == Status::Failed {
        anyhow::bail!("{}", state.message().unwrap_or("operation failed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_state_is_an_error() {
        let mut state: State<String> = State::idle();
        state.apply(Status::Failed, Some("Key not found: x.pub"), None);
        let err = report_state(&state, OutputFormat::Text, true).unwrap_err();
        assert_eq!(err.to_string(), "Key not found: x.pub");

        state.apply(Status::Success, Some("Removed x.pub"), Some("x.pub".to_string()));
        assert!(report_state(&state, OutputFormat::Text, true).is_ok());
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(true, "Agent running"), "[OK] Agent running");
        assert_eq!(status_line(false, "Agent running"), "[  ] Agent running");
    }
}
