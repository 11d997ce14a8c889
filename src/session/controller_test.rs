use super::*;
use crate::test_helpers::{self, EMAIL, Failure, GOOD_TOKEN, PASSWORD, sample_profile};

fn cached_profile() -> UserProfile {
    UserProfile { first_name: "Cached".into(), ..sample_profile() }
}

// =============================================================================
// initialize
// =============================================================================

#[tokio::test]
async fn initialize_without_token_is_anonymous_and_offline() {
    let mut session = test_helpers::controller();
    assert!(session.is_loading());
    session.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
    assert_eq!(session.state().phase, SessionPhase::Anonymous);
    assert!(session.api().calls().is_empty());
}

#[tokio::test]
async fn initialize_with_token_but_no_profile_stays_anonymous() {
    let store = crate::store::MemoryStore::with_entries([(AUTH_TOKEN_KEY, GOOD_TOKEN)]);
    let mut session = SessionController::new(test_helpers::MockApi::default(), store);
    session.initialize().await;
    assert!(!session.is_authenticated());
    assert!(session.api().calls().is_empty());
}

#[tokio::test]
async fn restore_then_refresh_moves_cached_to_confirmed() {
    let mut session = test_helpers::restored_controller(GOOD_TOKEN, &cached_profile());

    assert!(session.restore());
    assert!(session.is_authenticated());
    assert_eq!(session.state().profile, ProfileStatus::Cached);
    assert_eq!(session.user().map(|u| u.first_name.as_str()), Some("Cached"));

    session.refresh_profile().await;
    assert_eq!(session.state().profile, ProfileStatus::Confirmed);
    assert_eq!(session.user().map(|u| u.first_name.as_str()), Some("Ada"));
    let stored: UserProfile = serde_json::from_str(&session.store().get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored.first_name, "Ada");
}

#[tokio::test]
async fn initialize_with_rejected_token_logs_out_and_clears_store() {
    let mut session = test_helpers::restored_controller("tok-stale", &cached_profile());
    session.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
    assert!(session.user().is_none());
    assert_eq!(session.store().get(AUTH_TOKEN_KEY), None);
    assert_eq!(session.store().get(USER_KEY), None);
}

#[tokio::test]
async fn initialize_keeps_cached_profile_on_other_failures() {
    let mut session = test_helpers::restored_controller(GOOD_TOKEN, &cached_profile());
    session.api().fail_profile(Failure::Status(503, "maintenance"));
    session.initialize().await;

    assert!(session.is_authenticated());
    assert!(!session.is_loading());
    assert_eq!(session.state().profile, ProfileStatus::Cached);
    assert_eq!(session.user().map(|u| u.first_name.as_str()), Some("Cached"));
    assert!(session.store().get(AUTH_TOKEN_KEY).is_some());
}

#[tokio::test]
async fn initialize_ignores_unreadable_cached_profile() {
    let store = crate::store::MemoryStore::with_entries([(AUTH_TOKEN_KEY, GOOD_TOKEN), (USER_KEY, "{not json")]);
    let mut session = SessionController::new(test_helpers::MockApi::default(), store);
    session.initialize().await;
    assert!(!session.is_authenticated());
    assert_eq!(session.state().phase, SessionPhase::Anonymous);
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_success_authenticates_and_persists() {
    let mut session = test_helpers::controller();
    session.initialize().await;

    let outcome = session.login(EMAIL, PASSWORD).await;
    assert!(outcome.is_success());
    assert!(session.is_authenticated());
    assert_eq!(session.state().phase, SessionPhase::Authenticated);
    assert_eq!(session.state().profile, ProfileStatus::Confirmed);
    assert_eq!(session.user().map(|u| u.email.as_str()), Some(EMAIL));
    assert_eq!(session.store().get(AUTH_TOKEN_KEY).as_deref(), Some(GOOD_TOKEN));
    assert!(session.store().get(USER_KEY).is_some());
    assert_eq!(session.api().calls(), ["login", "get_profile"]);
}

#[tokio::test]
async fn login_with_bad_credentials_leaves_state_unchanged() {
    let mut session = test_helpers::controller();
    session.initialize().await;
    let before = session.state().clone();
    let store_before = session.store().clone();

    let outcome = session.login(EMAIL, "wrong").await;
    assert_eq!(outcome.error(), Some("Invalid email or password"));
    assert_eq!(session.state(), &before);
    assert_eq!(session.store(), &store_before);
}

#[tokio::test]
async fn login_rolls_back_when_profile_fetch_fails() {
    let mut session = test_helpers::controller();
    session.initialize().await;
    session.api().fail_profile(Failure::Transport);

    let outcome = session.login(EMAIL, PASSWORD).await;
    assert_eq!(outcome.error(), Some(LOGIN_PROFILE_FAILED));
    assert!(!session.is_authenticated());
    assert_eq!(session.state().phase, SessionPhase::Anonymous);
    assert_eq!(session.store().get(AUTH_TOKEN_KEY), None);
}

#[tokio::test]
async fn login_rollback_restores_previous_session() {
    let mut session = test_helpers::restored_controller("tok-old", &cached_profile());
    session.restore();
    session.api().fail_profile(Failure::Status(500, ""));

    let outcome = session.login(EMAIL, PASSWORD).await;
    assert!(!outcome.is_success());
    assert_eq!(session.token(), Some("tok-old"));
    assert_eq!(session.store().get(AUTH_TOKEN_KEY).as_deref(), Some("tok-old"));
    assert_eq!(session.user().map(|u| u.first_name.as_str()), Some("Cached"));
}

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_returns_message_without_touching_session() {
    let session = test_helpers::controller();
    let request = RegistrationRequest { email: "new@example.com".into(), ..RegistrationRequest::default() };
    let outcome = session.register(&request).await;
    assert!(outcome.message().unwrap_or_default().contains("registered"));
    assert!(!session.is_authenticated());
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn register_failure_surfaces_api_message() {
    let session = test_helpers::controller();
    let request = RegistrationRequest { email: EMAIL.into(), ..RegistrationRequest::default() };
    let outcome = session.register(&request).await;
    assert_eq!(outcome.error(), Some("Email already registered"));
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_clears_everything_and_is_idempotent() {
    let mut session = test_helpers::controller();
    session.login(EMAIL, PASSWORD).await;
    assert!(session.is_authenticated());

    session.logout();
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert_eq!(session.store().get(AUTH_TOKEN_KEY), None);
    assert_eq!(session.store().get(USER_KEY), None);

    session.logout();
    assert_eq!(session.state().phase, SessionPhase::Anonymous);
}

#[test]
fn logout_on_fresh_controller_is_anonymous() {
    let mut session = test_helpers::controller();
    session.logout();
    assert!(!session.is_authenticated());
    assert_eq!(session.state().profile, ProfileStatus::Missing);
}

// =============================================================================
// update_profile
// =============================================================================

#[tokio::test]
async fn update_profile_refetches_and_persists() {
    let mut session = test_helpers::controller();
    session.login(EMAIL, PASSWORD).await;

    let update = ProfileUpdate { phone_number: Some("0999".into()), ..ProfileUpdate::default() };
    let outcome = session.update_profile(&update).await;
    assert_eq!(outcome.message(), Some("Profile updated successfully"));
    assert_eq!(session.user().and_then(|u| u.phone_number.as_deref()), Some("0999"));
    let stored: UserProfile = serde_json::from_str(&session.store().get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored.phone_number.as_deref(), Some("0999"));
}

#[tokio::test]
async fn update_profile_requires_login() {
    let mut session = test_helpers::controller();
    let outcome = session.update_profile(&ProfileUpdate::default()).await;
    assert_eq!(outcome.error(), Some(UPDATE_REQUIRES_LOGIN));
    assert!(session.api().calls().is_empty());
}

#[tokio::test]
async fn update_profile_failure_does_not_mutate_state() {
    let mut session = test_helpers::controller();
    session.login(EMAIL, PASSWORD).await;
    session.api().fail_update(Failure::Status(400, r#"{"message":"Phone number invalid"}"#));
    let before = session.state().clone();

    let update = ProfileUpdate { phone_number: Some("x".into()), ..ProfileUpdate::default() };
    let outcome = session.update_profile(&update).await;
    assert_eq!(outcome.error(), Some("Phone number invalid"));
    assert_eq!(session.state(), &before);
}

#[tokio::test]
async fn update_profile_generic_message_on_transport_error() {
    let mut session = test_helpers::controller();
    session.login(EMAIL, PASSWORD).await;
    session.api().fail_update(Failure::Transport);
    let outcome = session.update_profile(&ProfileUpdate::default()).await;
    assert_eq!(outcome.error(), Some(UPDATE_FAILED));
}

#[tokio::test]
async fn update_profile_unauthorized_refetch_logs_out() {
    let mut session = test_helpers::controller();
    session.login(EMAIL, PASSWORD).await;
    session.api().fail_profile(Failure::Status(401, ""));

    let outcome = session.update_profile(&ProfileUpdate::default()).await;
    assert!(!outcome.is_success());
    assert!(!session.is_authenticated());
    assert_eq!(session.store().get(AUTH_TOKEN_KEY), None);
}
