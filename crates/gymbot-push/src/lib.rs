//! `gymbot-push`: push-notification delivery.
//!
//! A dispatch batch runs in the background, detached from the conversational
//! reply that triggered it:
//!
//! 1. mint one access token from the service account key (failure aborts the batch)
//! 2. query every subscriber of the topic (failure aborts the batch)
//! 3. send one notification per subscriber concurrently; individual failures
//!    are logged and counted, never retried

pub mod client;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod notification;

pub use client::{ActionsPushClient, PushTransport};
pub use credentials::AccessToken;
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::PushError;
pub use notification::Notification;
