//! Types shared between the calorie-counter API server and its clients:
//! the access-level model, token claim shapes, JSON envelopes and the
//! server configuration file format.

pub mod config;
pub mod types;
