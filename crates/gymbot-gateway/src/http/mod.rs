pub mod auth;
pub mod fulfillment;
pub mod health;
