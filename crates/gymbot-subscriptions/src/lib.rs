//! `gymbot-subscriptions`: the subscriber collection.
//!
//! Each record pairs a push-capable user identifier with the notification
//! topic the user opted into. Records are only ever added and queried;
//! there is no update or unsubscribe path.

pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{Result, StoreError};
pub use manager::{SqliteSubscriberStore, SubscriberStore};
pub use types::{Subscriber, Topic};
