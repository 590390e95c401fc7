use serde::{Deserialize, Serialize};
use tracing::warn;

pub const STATE_VERSION: u32 = 1;

fn current_version() -> u32 {
    STATE_VERSION
}

/// Per-conversation state carried between turns by the platform.
///
/// Serialized as a JSON string in the conversation context, so the
/// `version` field lets later releases recognise older payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default = "current_version")]
    pub version: u32,
    /// Consecutive misunderstood turns.
    #[serde(default)]
    pub fallback_count: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            fallback_count: 0,
        }
    }
}

impl SessionState {
    /// Decode the context payload. Missing, malformed, or newer-version data
    /// starts a fresh state.
    pub fn from_data(data: Option<&str>) -> Self {
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str::<SessionState>(data) {
            Ok(state) if state.version <= STATE_VERSION => state,
            Ok(state) => {
                warn!(version = state.version, "session state from a newer release, resetting");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "unreadable session state, resetting");
                Self::default()
            }
        }
    }

    pub fn to_data(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_data_is_default() {
        assert_eq!(SessionState::from_data(None), SessionState::default());
        assert_eq!(SessionState::from_data(Some("")), SessionState::default());
    }

    #[test]
    fn decodes_written_state() {
        let state = SessionState {
            version: STATE_VERSION,
            fallback_count: 2,
        };
        assert_eq!(SessionState::from_data(Some(&state.to_data())), state);
    }

    #[test]
    fn unversioned_payload_is_accepted() {
        let state = SessionState::from_data(Some(r#"{"fallbackCount":1}"#));
        assert_eq!(state.fallback_count, 1);
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn garbage_and_future_versions_reset() {
        assert_eq!(SessionState::from_data(Some("{not json")), SessionState::default());
        assert_eq!(
            SessionState::from_data(Some(r#"{"version":99,"fallbackCount":2}"#)),
            SessionState::default()
        );
    }
}
