pub mod json_response;

pub use json_response::*;
