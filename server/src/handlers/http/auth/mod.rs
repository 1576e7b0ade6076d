pub mod login;
pub mod me;
pub mod password;
pub mod register;

pub use login::{handle_check_authenticated, handle_login};
pub use me::handle_me;
pub use password::{handle_change_password, handle_request_reset};
pub use register::{handle_register, handle_verify};
