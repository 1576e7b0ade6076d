pub mod access_level;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod moderation;
pub mod password;
pub mod register;
pub mod server_config;

pub use self::access_level::{AccessLevel, InvalidAccessLevel};
pub use self::json_error::ErrorResponse;
pub use self::jwt::{PasswordResetClaims, SessionClaims, TokenClaims, TokenKind, VerificationClaims};
pub use self::login::{CheckAuthRequest, CheckAuthResponse, CredentialError, Credentials, TokenResponse};
pub use self::moderation::{AccountSummary, SetAccessLevelRequest, TargetRequest};
pub use self::password::{ChangePasswordRequest, ResetRequest};
pub use self::register::VerifyRequest;
