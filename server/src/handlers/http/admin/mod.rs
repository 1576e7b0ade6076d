pub mod moderation;

pub use moderation::{handle_ban, handle_set_access_level, handle_unban};
