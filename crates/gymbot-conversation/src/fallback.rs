//! Escalation for turns the assistant could not act on.
//!
//! Misunderstood turns are counted locally in [`SessionState`]; silent turns
//! are counted by the platform and arrive as `REPROMPT_COUNT`.

use crate::intent::Intent;
use crate::state::SessionState;

/// Reprompt tone after consecutive fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Mild,
    Detailed,
    /// Give up and end the conversation.
    Terminal,
}

/// Runs before every handler: any understood turn clears the count.
pub fn reset_unless_fallback(intent: Intent, state: &mut SessionState) {
    if intent != Intent::Fallback {
        state.fallback_count = 0;
    }
}

/// Count one more fallback turn and pick the reprompt.
pub fn record_fallback(state: &mut SessionState) -> Escalation {
    state.fallback_count = state.fallback_count.saturating_add(1);
    match state.fallback_count {
        0 | 1 => Escalation::Mild,
        2 => Escalation::Detailed,
        _ => Escalation::Terminal,
    }
}

/// Reprompt step for a no-input turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoInputStep {
    First,
    Second,
    Final,
}

pub fn no_input_step(reprompt_count: i64, is_final: bool) -> NoInputStep {
    if is_final {
        return NoInputStep::Final;
    }
    match reprompt_count {
        i64::MIN..=0 => NoInputStep::First,
        1 => NoInputStep::Second,
        _ => NoInputStep::Final,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_fallbacks_escalate_in_order() {
        let mut state = SessionState::default();
        assert_eq!(record_fallback(&mut state), Escalation::Mild);
        assert_eq!(record_fallback(&mut state), Escalation::Detailed);
        assert_eq!(record_fallback(&mut state), Escalation::Terminal);
        assert_eq!(state.fallback_count, 3);
    }

    #[test]
    fn count_never_decreases_through_fallbacks() {
        let mut state = SessionState::default();
        let mut last = 0;
        for _ in 0..6 {
            reset_unless_fallback(Intent::Fallback, &mut state);
            record_fallback(&mut state);
            assert!(state.fallback_count > last);
            last = state.fallback_count;
        }
    }

    #[test]
    fn any_other_intent_resets_to_zero() {
        for intent in Intent::ALL.into_iter().filter(|i| *i != Intent::Fallback) {
            let mut state = SessionState {
                fallback_count: 2,
                ..SessionState::default()
            };
            reset_unless_fallback(intent, &mut state);
            assert_eq!(state.fallback_count, 0, "{intent} did not reset");
        }
    }

    #[test]
    fn fallback_intent_keeps_count() {
        let mut state = SessionState {
            fallback_count: 2,
            ..SessionState::default()
        };
        reset_unless_fallback(Intent::Fallback, &mut state);
        assert_eq!(state.fallback_count, 2);
    }

    #[test]
    fn no_input_steps() {
        assert_eq!(no_input_step(0, false), NoInputStep::First);
        assert_eq!(no_input_step(1, false), NoInputStep::Second);
        assert_eq!(no_input_step(2, false), NoInputStep::Final);
        assert_eq!(no_input_step(0, true), NoInputStep::Final);
    }
}
