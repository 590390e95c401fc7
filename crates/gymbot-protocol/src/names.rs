//! Platform-defined argument, capability, and system-intent names.

// Arguments attached to `inputs[].arguments[]`.
pub const ARG_PERMISSION: &str = "PERMISSION";
pub const ARG_UPDATES_USER_ID: &str = "UPDATES_USER_ID";
pub const ARG_REGISTER_UPDATE: &str = "REGISTER_UPDATE";
pub const ARG_REPROMPT_COUNT: &str = "REPROMPT_COUNT";
pub const ARG_IS_FINAL_REPROMPT: &str = "IS_FINAL_REPROMPT";
/// Present when the turn was re-invoked by a scheduled daily update.
pub const ARG_UPDATES: &str = "UPDATES";

pub const CAP_SCREEN_OUTPUT: &str = "actions.capability.SCREEN_OUTPUT";

pub const SYSTEM_INTENT_REGISTER_UPDATE: &str = "actions.intent.REGISTER_UPDATE";
pub const SYSTEM_INTENT_PERMISSION: &str = "actions.intent.PERMISSION";

/// Output context that carries conversation data between turns.
pub const CONVERSATION_CONTEXT: &str = "_actions_on_google";
pub const CONVERSATION_CONTEXT_LIFESPAN: u32 = 99;
