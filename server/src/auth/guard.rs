use std::sync::Arc;

use tracing::{error, info, warn};

use cc_shared::types::AccessLevel;

use super::error::AuthError;
use crate::database::{Account, AccountStore};

/// Hierarchy check behind ban, unban and set-access-level.
///
/// An actor may only change the level of a target strictly below itself,
/// and never its own.
#[derive(Clone)]
pub struct PrivilegeGuard {
    store: Arc<dyn AccountStore>,
}

impl PrivilegeGuard {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn ban(&self, actor_id: i64, target_id: i64) -> Result<(), AuthError> {
        self.apply(actor_id, target_id, AccessLevel::BANNED).await
    }

    pub async fn unban(&self, actor_id: i64, target_id: i64) -> Result<(), AuthError> {
        self.apply(actor_id, target_id, AccessLevel::USER).await
    }

    /// Admin is never grantable here, whatever the actor's own level.
    pub async fn set_access_level(
        &self,
        actor_id: i64,
        target_id: i64,
        requested: AccessLevel,
    ) -> Result<(), AuthError> {
        check_not_self(actor_id, target_id)?;
        if requested >= AccessLevel::ADMIN {
            warn!("User {} tried to grant {} to {}", actor_id, requested, target_id);
            return Err(AuthError::CannotGrantAdmin);
        }
        self.apply(actor_id, target_id, requested).await
    }

    async fn apply(
        &self,
        actor_id: i64,
        target_id: i64,
        level: AccessLevel,
    ) -> Result<(), AuthError> {
        check_not_self(actor_id, target_id)?;

        let actor = self.load(actor_id).await?;
        let target = self.load(target_id).await?;

        if target.access_level >= actor.access_level {
            warn!(
                "User {} at {} cannot act on user {} at {}",
                actor.id, actor.access_level, target.id, target.access_level
            );
            return Err(AuthError::InsufficientPrivilege);
        }

        self.store.set_access_level(target.id, level).await?;
        info!(
            "User {} changed user {} from {} to {}",
            actor.id, target.id, target.access_level, level
        );
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Account, AuthError> {
        self.store.get_by_id(id).await?.ok_or_else(|| {
            error!("Account {} missing during privilege check", id);
            AuthError::AccountMissing(id)
        })
    }
}

fn check_not_self(actor_id: i64, target_id: i64) -> Result<(), AuthError> {
    if actor_id == target_id {
        warn!("User {} tried to change their own access level", actor_id);
        return Err(AuthError::CannotActOnSelf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::database::MemoryAccountStore;

    async fn seeded(levels: &[(i64, AccessLevel)]) -> (PrivilegeGuard, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        for &(id, access_level) in levels {
            store
                .insert(Account {
                    id,
                    email: format!("u{id}@x.io"),
                    password_hash: String::new(),
                    access_level,
                    verified: true,
                    change_password_requested: false,
                })
                .await;
        }
        (PrivilegeGuard::new(store.clone()), store)
    }

    async fn level_of(store: &MemoryAccountStore, id: i64) -> AccessLevel {
        store.get_by_id(id).await.unwrap().unwrap().access_level
    }

    #[tokio::test]
    async fn moderator_bans_user() {
        let (guard, store) = seeded(&[(1, AccessLevel::MODERATOR), (2, AccessLevel::USER)]).await;
        guard.ban(1, 2).await.unwrap();
        assert_eq!(level_of(&store, 2).await, AccessLevel::BANNED);

        guard.unban(1, 2).await.unwrap();
        assert_eq!(level_of(&store, 2).await, AccessLevel::USER);
    }

    #[tokio::test]
    async fn admin_cannot_ban_self() {
        let (guard, store) = seeded(&[(1, AccessLevel::ADMIN)]).await;
        assert!(matches!(guard.ban(1, 1).await, Err(AuthError::CannotActOnSelf)));
        assert_eq!(level_of(&store, 1).await, AccessLevel::ADMIN);
    }

    #[tokio::test]
    async fn peers_cannot_act_on_each_other() {
        let (guard, store) =
            seeded(&[(1, AccessLevel::MODERATOR), (2, AccessLevel::MODERATOR)]).await;
        assert!(matches!(
            guard.ban(1, 2).await,
            Err(AuthError::InsufficientPrivilege)
        ));
        assert_eq!(level_of(&store, 2).await, AccessLevel::MODERATOR);
    }

    #[tokio::test]
    async fn moderator_cannot_ban_admin() {
        let (guard, store) = seeded(&[(1, AccessLevel::MODERATOR), (2, AccessLevel::ADMIN)]).await;
        assert!(matches!(
            guard.ban(1, 2).await,
            Err(AuthError::InsufficientPrivilege)
        ));
        assert!(matches!(
            guard.set_access_level(1, 2, AccessLevel::USER).await,
            Err(AuthError::InsufficientPrivilege)
        ));
        assert_eq!(level_of(&store, 2).await, AccessLevel::ADMIN);
    }

    fn any_level() -> impl Strategy<Value = AccessLevel> {
        prop::sample::select(AccessLevel::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn ban_succeeds_iff_target_is_strictly_below_actor(
            actor in any_level(),
            target in any_level(),
        ) {
            let (outcome, after) = tokio_test::block_on(async {
                let (guard, store) = seeded(&[(1, actor), (2, target)]).await;
                let outcome = guard.ban(1, 2).await;
                (outcome, level_of(&store, 2).await)
            });

            if target < actor {
                prop_assert!(outcome.is_ok());
                prop_assert_eq!(after, AccessLevel::BANNED);
            } else {
                prop_assert!(matches!(outcome, Err(AuthError::InsufficientPrivilege)));
                prop_assert_eq!(after, target);
            }
        }
    }

    #[tokio::test]
    async fn set_access_level_persists_requested_level() {
        let (guard, store) = seeded(&[(1, AccessLevel::ADMIN), (2, AccessLevel::USER)]).await;
        guard
            .set_access_level(1, 2, AccessLevel::MODERATOR)
            .await
            .unwrap();
        assert_eq!(level_of(&store, 2).await, AccessLevel::MODERATOR);
    }

    #[tokio::test]
    async fn admin_is_never_granted() {
        let (guard, store) = seeded(&[(1, AccessLevel::ADMIN), (2, AccessLevel::USER)]).await;
        assert!(matches!(
            guard.set_access_level(1, 2, AccessLevel::ADMIN).await,
            Err(AuthError::CannotGrantAdmin)
        ));
        assert_eq!(level_of(&store, 2).await, AccessLevel::USER);
    }

    #[tokio::test]
    async fn missing_target_is_internal() {
        let (guard, _) = seeded(&[(1, AccessLevel::ADMIN)]).await;
        let err = guard.ban(1, 99).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountMissing(99)));
        assert!(err.is_internal());
    }
}
