//! Shared configuration and error types for the Action Gym webhook.

pub mod config;
pub mod error;

pub use config::GymbotConfig;
pub use error::{GymbotError, Result};
