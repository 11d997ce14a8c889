//! Session lifecycle controller.
//!
//! DESIGN
//! ======
//! One controller owns one `SessionState`, the API client, and the persisted
//! store. Every state change goes through its methods; there is no ambient
//! auth state. Methods take `&mut self`, so a single controller can never
//! have two operations in flight at once.
//!
//! ERROR HANDLING
//! ==============
//! Remote failures are converted to `ActionOutcome::Failure` at this
//! boundary. Store write failures are logged and otherwise ignored: the
//! in-memory state stays authoritative for the current run.

use crate::api::{ApiError, BookingApi, ProfileUpdate, RegistrationRequest, UserProfile};
use crate::store::{AUTH_TOKEN_KEY, SessionStore, USER_KEY};

use super::state::{ActionOutcome, ProfileStatus, SessionPhase, SessionState};

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const LOGIN_PROFILE_FAILED: &str = "Signed in, but your profile could not be loaded. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update profile.";
pub const UPDATE_REQUIRES_LOGIN: &str = "You must be logged in to update your profile.";

pub struct SessionController<A, S> {
    api: A,
    store: S,
    state: SessionState,
}

impl<A: BookingApi, S: SessionStore> SessionController<A, S> {
    #[must_use]
    pub fn new(api: A, store: S) -> Self {
        Self { api, store, state: SessionState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    // =========================================================================
    // STARTUP
    // =========================================================================

    /// Load token and cached profile from the store.
    ///
    /// Returns `true` when both were present and the session is now
    /// optimistically authenticated with a cached profile.
    pub fn restore(&mut self) -> bool {
        self.state.phase = SessionPhase::Initializing;

        let token = self.store.get(AUTH_TOKEN_KEY);
        let user = self.store.get(USER_KEY).and_then(|raw| match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "cached profile unreadable; ignoring");
                None
            }
        });

        match (token, user) {
            (Some(token), Some(user)) => {
                self.state.token = Some(token);
                self.state.user = Some(user);
                self.state.profile = ProfileStatus::Cached;
                self.state.phase = SessionPhase::Authenticated;
                true
            }
            _ => {
                self.state.phase = SessionPhase::Anonymous;
                false
            }
        }
    }

    /// Replace the cached profile with a fresh copy from the API.
    ///
    /// An unauthorized response logs the session out. Other failures keep
    /// whatever profile is already held.
    pub async fn refresh_profile(&mut self) {
        let Some(token) = self.state.token.clone() else {
            return;
        };
        match self.api.get_profile(&token).await {
            Ok(profile) => self.confirm_profile(profile),
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("stored token rejected; logging out");
                self.logout();
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile refresh failed; keeping cached profile");
            }
        }
    }

    /// Restore from the store, reconcile with the API, and mark loading done.
    pub async fn initialize(&mut self) {
        if self.restore() {
            self.refresh_profile().await;
        }
        self.state.is_loading = false;
        tracing::debug!(authenticated = self.is_authenticated(), "session initialized");
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    pub async fn login(&mut self, email: &str, password: &str) -> ActionOutcome {
        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "login rejected");
                return ActionOutcome::failure(e.payload_field("error").unwrap_or_else(|| LOGIN_FAILED.to_owned()));
            }
        };

        let previous = self.state.clone();
        let previous_token = self.store.get(AUTH_TOKEN_KEY);
        let previous_user = self.store.get(USER_KEY);

        self.store_set(AUTH_TOKEN_KEY, &response.token);
        self.state.token = Some(response.token.clone());
        self.state.phase = SessionPhase::Authenticated;

        match self.api.get_profile(&response.token).await {
            Ok(profile) => {
                self.confirm_profile(profile);
                tracing::info!("login succeeded");
                ActionOutcome::success()
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch after login failed; rolling back");
                self.state = previous;
                self.store_restore(AUTH_TOKEN_KEY, previous_token.as_deref());
                self.store_restore(USER_KEY, previous_user.as_deref());
                ActionOutcome::failure(e.payload_text().unwrap_or_else(|| LOGIN_PROFILE_FAILED.to_owned()))
            }
        }
    }

    pub async fn register(&self, request: &RegistrationRequest) -> ActionOutcome {
        match self.api.register(request).await {
            Ok(message) => ActionOutcome::success_with(message),
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                ActionOutcome::failure(e.payload_field("message").unwrap_or_else(|| REGISTRATION_FAILED.to_owned()))
            }
        }
    }

    /// Forget the session locally. Safe to call repeatedly.
    pub fn logout(&mut self) {
        let was_authenticated = self.is_authenticated();
        self.store_remove(AUTH_TOKEN_KEY);
        self.store_remove(USER_KEY);
        self.state.clear();
        if was_authenticated {
            tracing::info!("logged out");
        }
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> ActionOutcome {
        let Some(token) = self.state.token.clone() else {
            return ActionOutcome::failure(UPDATE_REQUIRES_LOGIN);
        };

        let message = match self.api.update_profile(&token, update).await {
            Ok(message) => message,
            Err(e) => return update_failure(&e),
        };

        match self.api.get_profile(&token).await {
            Ok(profile) => {
                self.confirm_profile(profile);
                tracing::info!("profile updated");
                ActionOutcome::Success { message: (!message.is_empty()).then_some(message) }
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.logout();
                }
                update_failure(&e)
            }
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn confirm_profile(&mut self, profile: UserProfile) {
        match serde_json::to_string(&profile) {
            Ok(raw) => self.store_set(USER_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "profile not serializable; not cached"),
        }
        self.state.user = Some(profile);
        self.state.profile = ProfileStatus::Confirmed;
    }

    fn store_set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(%key, error = %e, "session store write failed");
        }
    }

    fn store_remove(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(%key, error = %e, "session store remove failed");
        }
    }

    fn store_restore(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => self.store_set(key, value),
            None => self.store_remove(key),
        }
    }
}

fn update_failure(e: &ApiError) -> ActionOutcome {
    tracing::warn!(error = %e, "profile update failed");
    ActionOutcome::failure(e.payload_field("message").unwrap_or_else(|| UPDATE_FAILED.to_owned()))
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
