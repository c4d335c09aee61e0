pub mod auth;
pub mod documents;
pub mod error;
pub mod health;
pub mod sharing;
