use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// An outgoing message. The auth core builds these; delivery is someone
/// else's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn verification(to: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "You have registered to CC-APP".to_string(),
            body: format!("This is your verification link: {}", link),
        }
    }

    pub fn password_reset(to: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Change password request in CC-APP".to_string(),
            body: format!(
                "To change your password, please click following link: {}",
                link
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError>;
}

/// Writes outgoing mail to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        info!(to = %mail.to, subject = %mail.subject, "{}", mail.body);
        Ok(())
    }
}
