//! Registration, login, and logout through the session manager.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use secondhand_integration_tests::{PASSWORD, TestContext};
use secondhand_market::ErrorKind;
use secondhand_market::MarketError;
use secondhand_market::models::ProfileUpdate;
use secondhand_market::services::AuthError;

#[test]
fn test_register_then_login() {
    let ctx = TestContext::new();
    let session = ctx.market.session();

    let registered = session
        .register("ann@example.com", "thrift_ann", PASSWORD)
        .unwrap();
    let current = session.current_user().unwrap();
    assert_eq!(current.email.as_str(), "ann@example.com");
    assert_eq!(current.username, "thrift_ann");
    assert_eq!(current, registered);

    session.logout();
    let logged_in = session.login("ann@example.com", PASSWORD).unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert!(session.is_authenticated());
}

#[test]
fn test_duplicate_registration() {
    let ctx = TestContext::new();
    let session = ctx.market.session();
    session
        .register("ann@example.com", "thrift_ann", PASSWORD)
        .unwrap();

    let err = session
        .register("ann@example.com", "someone_else", PASSWORD)
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));

    let err = session
        .register("other@example.com", "thrift_ann", PASSWORD)
        .unwrap_err();
    assert_eq!(MarketError::from(err).kind(), ErrorKind::DuplicateUsername);
}

#[test]
fn test_failed_login_keeps_current_session() {
    let ctx = TestContext::new();
    let ann = ctx.register("thrift_ann");
    ctx.register("vinyl_ben");
    let session = ctx.market.session();
    session.login("thrift_ann@example.com", PASSWORD).unwrap();

    let wrong_password = session
        .login("vinyl_ben@example.com", "not the password")
        .unwrap_err();
    let unknown_email = session.login("nobody@example.com", PASSWORD).unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    assert_eq!(
        MarketError::from(wrong_password).user_message(),
        MarketError::from(unknown_email).user_message()
    );
    assert_eq!(session.current_user().unwrap().id, ann.id);
}

#[test]
fn test_logout_is_idempotent() {
    let ctx = TestContext::new();
    ctx.register("thrift_ann");
    let session = ctx.market.session();

    let notified = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&notified);
    session.subscribe(move |_| *sink.lock().unwrap() += 1);

    session.logout();
    assert!(!session.is_authenticated());
    session.logout();
    assert!(!session.is_authenticated());

    assert_eq!(*notified.lock().unwrap(), 1);
}

#[test]
fn test_profile_update_reaches_listings() {
    let ctx = TestContext::new();
    let ann = ctx.register("thrift_ann");
    let product = ctx.list(&ann.id, "Oak Bookshelf", "80.00");

    ctx.market
        .session()
        .update_profile(ProfileUpdate {
            username: Some("ann_renamed".to_owned()),
            ..ProfileUpdate::default()
        })
        .unwrap();

    let entry = ctx.market.products().get_by_id(&product.id).unwrap();
    assert_eq!(entry.seller.username, "ann_renamed");
    assert_eq!(
        ctx.market.session().current_user().unwrap().username,
        "ann_renamed"
    );
}

#[test]
fn test_actions_require_session() {
    let ctx = TestContext::new();
    let err = ctx.market.session().require_session().unwrap_err();
    assert_eq!(MarketError::from(err).kind(), ErrorKind::Unauthenticated);
}
