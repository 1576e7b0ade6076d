mod common;

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use jsonwebtoken::get_current_timestamp;
use proptest::prelude::*;

use cc_server::auth::{AuthError, ErrorCategory};
use cc_server::database::AccountStore;
use cc_shared::types::AccessLevel;

use common::{Harness, bearer};

fn protected_level() -> impl Strategy<Value = AccessLevel> {
    prop::sample::select(vec![
        AccessLevel::USER,
        AccessLevel::MODERATOR,
        AccessLevel::ADMIN,
    ])
}

fn any_level() -> impl Strategy<Value = AccessLevel> {
    prop::sample::select(AccessLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn admits_iff_stored_level_reaches_required(
        stored in any_level(),
        required in any_level(),
    ) {
        let outcome = tokio_test::block_on(async {
            let h = Harness::new();
            let account = h.seed(1, stored).await;
            let token = h.session_for(&account);
            h.state.gate.authorize(&bearer(&token), required).await
        });

        if required == AccessLevel::DEFAULT {
            prop_assert!(matches!(outcome, Ok(None)));
        } else if stored.is_banned() {
            prop_assert!(matches!(outcome, Err(AuthError::Banished)));
        } else if stored >= required {
            let ctx = outcome.unwrap().unwrap();
            prop_assert_eq!(ctx.user_id, 1);
            prop_assert_eq!(ctx.access_level, stored);
        } else {
            prop_assert!(matches!(outcome, Err(AuthError::AccessDenied)));
        }
    }

    #[test]
    fn token_level_is_ignored_in_favour_of_stored_level(
        at_issue in any_level(),
        now_stored in any_level(),
        required in protected_level(),
    ) {
        let admitted = tokio_test::block_on(async {
            let h = Harness::new();
            let account = h.seed(1, at_issue).await;
            let token = h.session_for(&account);
            h.store.set_access_level(1, now_stored).await.unwrap();
            h.state.gate.authorize(&bearer(&token), required).await.is_ok()
        });
        prop_assert_eq!(admitted, !now_stored.is_banned() && now_stored >= required);
    }
}

#[tokio::test]
async fn default_level_needs_no_header() {
    let h = Harness::new();
    let outcome = h
        .state
        .gate
        .authorize(&HeaderMap::new(), AccessLevel::DEFAULT)
        .await
        .unwrap();
    assert!(outcome.is_none());

    // Not even a broken header is looked at.
    let mut junk = HeaderMap::new();
    junk.insert(AUTHORIZATION, HeaderValue::from_static("three part header"));
    assert!(
        h.state
            .gate
            .authorize(&junk, AccessLevel::DEFAULT)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn ban_applies_to_tokens_issued_before_it() {
    let h = Harness::new();
    let account = h.seed(1, AccessLevel::MODERATOR).await;
    let token = h.session_for(&account);

    assert!(
        h.state
            .gate
            .authorize(&bearer(&token), AccessLevel::USER)
            .await
            .is_ok()
    );

    h.store
        .set_access_level(1, AccessLevel::BANNED)
        .await
        .unwrap();

    for required in [AccessLevel::USER, AccessLevel::MODERATOR, AccessLevel::ADMIN] {
        let err = h
            .state
            .gate
            .authorize(&bearer(&token), required)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Banished));
        assert_eq!(err.category(), ErrorCategory::Authorization);
    }
}

#[tokio::test]
async fn token_expired_one_second_ago_is_unauthenticated() {
    let h = Harness::new();
    let account = h.seed(1, AccessLevel::ADMIN).await;
    // exp = issued + 6h, so issuing 6h + 1s ago yields exp = now - 1.
    let issued = get_current_timestamp() - 6 * 3600 - 1;
    let token = h.issuer.issue_session_at(&account, issued).unwrap();

    let err = h
        .state
        .gate
        .authorize(&bearer(&token), AccessLevel::USER)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated(_)));
    assert_eq!(err.category(), ErrorCategory::Authentication);
}

#[tokio::test]
async fn header_problems() {
    let h = Harness::new();

    let err = h
        .state
        .gate
        .authorize(&HeaderMap::new(), AccessLevel::USER)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingToken));

    let mut one_part = HeaderMap::new();
    one_part.insert(AUTHORIZATION, HeaderValue::from_static("token-only"));
    let err = h
        .state
        .gate
        .authorize(&one_part, AccessLevel::USER)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MalformedHeader));
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[tokio::test]
async fn token_for_a_vanished_account_is_unauthenticated() {
    let h = Harness::new();
    let account = h.seed(1, AccessLevel::USER).await;
    let mut ghost = account.clone();
    ghost.id = 404;
    let token = h.session_for(&ghost);

    let err = h
        .state
        .gate
        .authorize(&bearer(&token), AccessLevel::USER)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated(_)));
}

#[tokio::test]
async fn other_token_kinds_do_not_pass_the_gate() {
    let h = Harness::new();
    let account = h.seed(1, AccessLevel::ADMIN).await;

    for token in [
        h.issuer.issue_verification(&account).unwrap(),
        h.issuer.issue_password_reset(&account).unwrap(),
    ] {
        let err = h
            .state
            .gate
            .authorize(&bearer(&token), AccessLevel::USER)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated(_)));
    }
}

#[tokio::test]
async fn admitted_request_carries_its_context() {
    let h = Harness::new();
    let account = h.seed(7, AccessLevel::MODERATOR).await;
    let token = h.session_for(&account);

    let mut req = http::Request::builder()
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(())
        .unwrap();
    h.state
        .gate
        .authorize_request(&mut req, AccessLevel::MODERATOR)
        .await
        .unwrap();

    let ctx = req
        .extensions()
        .get::<cc_server::auth::AuthContext>()
        .copied()
        .unwrap();
    assert_eq!(ctx.user_id, 7);
    assert_eq!(ctx.access_level, AccessLevel::MODERATOR);
}
