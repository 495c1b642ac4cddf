//! Lifecycle state for asynchronous operations.
//!
//! A [`State`] records where an operation is (`idle`, `loading`, `success`,
//! `failed`) together with the last message and payload it produced. UI code
//! owns one `State` per operation and renders straight from it.
//!
//! Transitions go through [`apply_transition`]. The status is always
//! replaced, while `message` and `data` are only replaced when the caller
//! supplies a non-empty value. Earlier values stay in place otherwise, so a
//! `failed` transition without a message still shows the last message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an asynchronous operation currently is.
///
/// No ordering is implied and any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
    Loading,
    #[default]
    Idle,
}

impl Status {
    /// Lowercase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failed => "failed",
            Status::Loading => "loading",
            Status::Idle => "idle",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload that may be considered "blank".
///
/// Blank payloads never overwrite data already held by a [`State`].
pub trait Payload {
    fn is_blank(&self) -> bool;
}

impl Payload for Value {
    /// `null`, `false`, `0`, `""` and `{}` are blank. Arrays never are.
    fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Array(_) => false,
        }
    }
}

impl<T> Payload for Vec<T> {
    // An empty listing is still a result
    fn is_blank(&self) -> bool {
        false
    }
}

impl Payload for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Status, message and payload of one asynchronous operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State<T = Value> {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> State<T> {
    /// A fresh `{status: idle}` state with no message or data
    pub fn idle() -> Self {
        Self {
            status: Status::Idle,
            message: None,
            data: None,
        }
    }

    /// Drop the message and data and return to `idle`.
    ///
    /// [`apply_transition`] never does this on its own.
    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Message to show for this state, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl<T: Payload> State<T> {
    /// Apply a transition in place. See [`apply_transition`].
    pub fn apply(&mut self, status: Status, message: Option<&str>, data: Option<T>) {
        apply_transition(self, status, message, data);
    }
}

impl<T: Payload + Clone> State<T> {
    /// Return the state a transition would produce, leaving `self` untouched.
    pub fn transitioned(&self, status: Status, message: Option<&str>, data: Option<T>) -> Self {
        let mut next = self.clone();
        apply_transition(&mut next, status, message, data);
        next
    }
}

/// Move `state` to `new_status`.
///
/// The status is always overwritten. `new_message` replaces the current
/// message only when it is present and non-empty. `new_data` replaces the
/// current payload only when it is present and not [blank](Payload::is_blank).
/// Nothing is ever cleared.
pub fn apply_transition<T: Payload>(
    state: &mut State<T>,
    new_status: Status,
    new_message: Option<&str>,
    new_data: Option<T>,
) {
    state.status = new_status;

    if let Some(message) = new_message.filter(|m| !m.is_empty()) {
        state.message = Some(message.to_string());
    }

    if let Some(data) = new_data.filter(|d| !d.is_blank()) {
        state.data = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_only_transition_keeps_fields() {
        for status in &[Status::Success, Status::Failed, Status::Loading, Status::Idle] {
            let mut st: State = State {
                status: Status::Idle,
                message: Some("kept".to_string()),
                data: Some(json!({"id": 7})),
            };
            apply_transition(&mut st, *status, None, None);
            assert_eq!(st.status, *status);
            assert_eq!(st.message(), Some("kept"));
            assert_eq!(st.data, Some(json!({"id": 7})));
        }
    }

    #[test]
    fn test_message_is_sticky() {
        let mut st: State = State::idle();
        apply_transition(&mut st, Status::Failed, Some("boom"), None);
        assert_eq!(st.message(), Some("boom"));

        apply_transition(&mut st, Status::Loading, None, None);
        assert_eq!(st.status, Status::Loading);
        assert_eq!(st.message(), Some("boom"));

        // An empty message counts as not supplied
        apply_transition(&mut st, Status::Idle, Some(""), None);
        assert_eq!(st.message(), Some("boom"));
    }

    #[test]
    fn test_empty_object_does_not_overwrite() {
        let mut st: State = State::idle();
        apply_transition(&mut st, Status::Success, None, Some(json!({"id": 1})));
        apply_transition(&mut st, Status::Success, None, Some(json!({})));
        assert_eq!(st.data, Some(json!({"id": 1})));

        apply_transition(&mut st, Status::Success, None, Some(Value::Null));
        assert_eq!(st.data, Some(json!({"id": 1})));
    }

    #[test]
    fn test_non_empty_data_replaces() {
        let mut st: State = State::idle();
        apply_transition(&mut st, Status::Success, None, Some(json!({"id": 1})));
        apply_transition(&mut st, Status::Success, None, Some(json!([])));
        assert_eq!(st.data, Some(json!([])));

        apply_transition(&mut st, Status::Success, None, Some(json!({"id": 2})));
        assert_eq!(st.data, Some(json!({"id": 2})));
    }

    #[test]
    fn test_lifecycle_scenario() {
        let mut st: State = State::idle();

        apply_transition(&mut st, Status::Loading, None, None);
        assert_eq!(st, State { status: Status::Loading, message: None, data: None });

        apply_transition(&mut st, Status::Success, Some("Done"), Some(json!({"id": 1})));
        assert_eq!(
            st,
            State {
                status: Status::Success,
                message: Some("Done".to_string()),
                data: Some(json!({"id": 1})),
            }
        );

        apply_transition(&mut st, Status::Failed, None, None);
        assert_eq!(
            st,
            State {
                status: Status::Failed,
                message: Some("Done".to_string()),
                data: Some(json!({"id": 1})),
            }
        );
    }

    #[test]
    fn test_empty_vec_is_a_result() {
        let mut st: State<Vec<u32>> = State::idle();
        st.apply(Status::Success, None, Some(vec![1, 2]));
        st.apply(Status::Success, None, Some(Vec::new()));
        assert_eq!(st.data, Some(Vec::new()));
    }

    #[test]
    fn test_transitioned_leaves_original() {
        let st: State = State::idle();
        let next = st.transitioned(Status::Success, Some("ok"), Some(json!({"n": 3})));
        assert_eq!(st.status, Status::Idle);
        assert_eq!(st.message, None);
        assert_eq!(next.status, Status::Success);
        assert_eq!(next.message(), Some("ok"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut st: State = State::idle();
        st.apply(Status::Failed, Some("nope"), Some(json!({"x": 1})));
        st.reset();
        assert_eq!(st, State::idle());
    }

    #[test]
    fn test_serialized_shape() {
        let st: State = State::idle();
        assert_eq!(serde_json::to_value(&st).unwrap(), json!({"status": "idle"}));

        let st = State::<Value>::idle().transitioned(Status::Success, Some("Done"), Some(json!({"id": 1})));
        assert_eq!(
            serde_json::to_value(&st).unwrap(),
            json!({"status": "success", "message": "Done", "data": {"id": 1}})
        );
    }

    #[test]
    fn test_value_blankness() {
        assert!(Value::Null.is_blank());
        assert!(json!(false).is_blank());
        assert!(json!(0).is_blank());
        assert!(json!("").is_blank());
        assert!(json!({}).is_blank());
        assert!(!json!([]).is_blank());
        assert!(!json!(true).is_blank());
        assert!(!json!(1.5).is_blank());
        assert!(!json!("x").is_blank());
    }
}
