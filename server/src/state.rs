use std::sync::Arc;

use crate::auth::{
    AuthSettings, Flows, Gate, PrivilegeGuard, TokenIssuer, TokenKeys, TokenVerifier,
};
use crate::database::AccountStore;
use crate::notifier::Notifier;

/// Everything a request handler needs. Cheap to clone; built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AuthSettings>,
    pub store: Arc<dyn AccountStore>,
    pub gate: Gate,
    pub flows: Flows,
    pub guard: PrivilegeGuard,
}

impl AppState {
    pub fn new(
        settings: AuthSettings,
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = Arc::new(settings);
        let keys = Arc::new(TokenKeys::from_settings(&settings));
        let issuer = TokenIssuer::new(keys.clone(), &settings);
        let verifier = TokenVerifier::new(keys, &settings);

        Self {
            gate: Gate::new(verifier.clone(), store.clone()),
            flows: Flows::new(
                store.clone(),
                notifier,
                issuer,
                verifier,
                settings.clone(),
            ),
            guard: PrivilegeGuard::new(store.clone()),
            settings,
            store,
        }
    }
}
