//! Authentication and tiered authorization for the CC API server.

pub mod auth;
pub mod database;
pub mod handlers;
pub mod notifier;
pub mod state;

pub use state::AppState;
