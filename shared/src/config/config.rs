use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, error, info};

use crate::types::jwt::TokenKind;
use crate::types::server_config::{AppConfig, AuthConfig, ConfigError};

pub const MIN_SECRET_LEN: usize = 32;

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path.display());

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

/// Reject configs the server cannot safely start with. Secrets are checked
/// after env-var resolution, so a file without secrets is fine when the
/// environment provides them.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.auth.token_validity_hours == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_validity_hours must be greater than 0".into(),
        ));
    }

    if config.auth.token_validity_secs().is_none() {
        return Err(ConfigError::InvalidConfig(format!(
            "token_validity_hours must be at most {}",
            u64::MAX / 3600
        )));
    }

    if config.auth.issuer.is_empty() {
        return Err(ConfigError::InvalidConfig("issuer cannot be empty".into()));
    }

    let mut seen = HashSet::new();
    for kind in TokenKind::ALL {
        let var = AuthConfig::secret_env_var(kind);
        let secret = config.auth.resolved_secret(kind).ok_or_else(|| {
            ConfigError::InvalidConfig(format!(
                "{kind} secret must be set via the {var} env var or the auth config section"
            ))
        })?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidConfig(format!(
                "{kind} secret must be at least {MIN_SECRET_LEN} characters long"
            )));
        }
        // Each kind has its own secret.
        if !seen.insert(secret) {
            return Err(ConfigError::InvalidConfig(format!(
                "{kind} secret must differ from the other token secrets"
            )));
        }
    }

    if config.auth.resolved_client_url().is_none() {
        return Err(ConfigError::InvalidConfig(
            "client_url must be set via the CLIENT_URL env var or auth.client_url".into(),
        ));
    }

    Ok(())
}
