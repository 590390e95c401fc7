//! `gymbot-conversation`: turn handling for the Action Gym assistant.
//!
//! A [`Turn`] is decoded from the platform request, routed by its [`Intent`]
//! to exactly one handler, and answered with a [`Reply`] plus the updated
//! [`SessionState`].

pub mod compose;
pub mod error;
pub mod fallback;
pub mod intent;
pub mod reply;
pub mod router;
pub mod state;
pub mod turn;

pub use error::{ConversationError, Result};
pub use intent::Intent;
pub use reply::{Directive, Helper, Reply};
pub use router::{TurnOutcome, TurnRouter};
pub use state::SessionState;
pub use turn::{PlatformArgs, Turn};
