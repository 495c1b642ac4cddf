//! Observable wrapper around [`State`]
//!
//! Owners that do not render every frame subscribe to a [`StateHandle`]
//! and are woken whenever a transition produces a new value.

use tokio::sync::watch;

use super::status::{Payload, State, Status};

/// A [`State`] published through a watch channel.
pub struct StateHandle<T> {
    tx: watch::Sender<State<T>>,
}

impl<T: Payload + Clone> StateHandle<T> {
    /// Create a handle holding an idle state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(State::idle());
        Self { tx }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<State<T>> {
        self.tx.subscribe()
    }

    /// Current value
    pub fn current(&self) -> State<T> {
        self.tx.borrow().clone()
    }

    /// Apply a transition and notify subscribers.
    ///
    /// The new value is built with [`State::transitioned`], so the field rules
    /// are the same as for an in-place transition. Returns the published value.
    pub fn apply(&self, status: Status, message: Option<&str>, data: Option<T>) -> State<T> {
        let next = self.tx.borrow().transitioned(status, message, data);
        self.tx.send_replace(next.clone());
        tracing::trace!("State handle moved to {}", status);
        next
    }

    /// Return to idle, clearing message and data
    pub fn reset(&self) {
        self.tx.send_replace(State::idle());
    }
}

impl<T: Payload + Clone> Default for StateHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let handle: StateHandle<Value> = StateHandle::new();
        let mut rx = handle.subscribe();

        handle.apply(Status::Loading, None, None);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, Status::Loading);

        handle.apply(Status::Success, Some("Done"), Some(json!({"id": 1})));
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.message(), Some("Done"));
        assert_eq!(seen.data, Some(json!({"id": 1})));
    }

    #[test]
    fn test_apply_keeps_sticky_fields() {
        let handle: StateHandle<Value> = StateHandle::new();
        handle.apply(Status::Success, Some("Done"), Some(json!({"id": 1})));
        let after = handle.apply(Status::Failed, None, None);

        assert_eq!(after.status, Status::Failed);
        assert_eq!(after.message(), Some("Done"));
        assert_eq!(handle.current(), after);
    }

    #[test]
    fn test_reset() {
        let handle: StateHandle<Value> = StateHandle::new();
        handle.apply(Status::Failed, Some("x"), None);
        handle.reset();
        assert_eq!(handle.current(), State::idle());
    }
}
