//! Multi-step sign-up: register, verify email, set password, sign in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Progress survives restarts through two store markers: `pendingEmail`
//! (registered, awaiting code) and `verifiedEmail` (code accepted, awaiting
//! password). Both are cleared once a password is set.

use crate::api::{BookingApi, RegistrationRequest};
use crate::store::{PENDING_EMAIL_KEY, SessionStore, VERIFIED_EMAIL_KEY};
use crate::validate::{self, FieldErrors};

use super::controller::SessionController;
use super::state::ActionOutcome;

pub const VERIFY_CODE_LEN: usize = 6;

pub const NO_PENDING_EMAIL: &str = "No email found. Please register again.";
pub const INCOMPLETE_CODE: &str = "Please enter the complete 6-digit code";
pub const INVALID_CODE: &str = "Invalid verification code";
pub const VERIFY_FAILED: &str = "Verification failed. Please try again.";
pub const EMAIL_NOT_VERIFIED: &str = "Email not verified. Please register again.";
pub const SET_PASSWORD_REJECTED: &str = "Failed to set password";
pub const SET_PASSWORD_FAILED: &str = "An error occurred. Please try again.";

/// Result of [`Onboarding::set_password`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetPasswordOutcome {
    /// Outcome of setting the password itself.
    pub outcome: ActionOutcome,
    /// Whether the follow-up automatic login succeeded.
    pub logged_in: bool,
}

/// Sign-up driver borrowing a session controller.
pub struct Onboarding<'c, A, S> {
    controller: &'c mut SessionController<A, S>,
}

impl<'c, A: BookingApi, S: SessionStore> Onboarding<'c, A, S> {
    pub fn new(controller: &'c mut SessionController<A, S>) -> Self {
        Self { controller }
    }

    #[must_use]
    pub fn pending_email(&self) -> Option<String> {
        self.controller.store().get(PENDING_EMAIL_KEY)
    }

    #[must_use]
    pub fn verified_email(&self) -> Option<String> {
        self.controller.store().get(VERIFIED_EMAIL_KEY)
    }

    /// Validate and submit the sign-up form; remembers the email on success.
    ///
    /// # Errors
    ///
    /// Returns the failing fields without calling the API.
    pub async fn register(&mut self, request: &RegistrationRequest) -> Result<ActionOutcome, FieldErrors> {
        validate::registration(request)?;
        let outcome = self.controller.register(request).await;
        if outcome.is_success() {
            self.mark(PENDING_EMAIL_KEY, request.email.trim());
        }
        Ok(outcome)
    }

    /// Submit the emailed code for `email`, or for the pending email.
    pub async fn verify(&mut self, email: Option<&str>, code: &str) -> ActionOutcome {
        let Some(email) = email.map(str::to_owned).or_else(|| self.pending_email()) else {
            return ActionOutcome::failure(NO_PENDING_EMAIL);
        };
        let code = code.trim();
        if code.chars().count() != VERIFY_CODE_LEN {
            return ActionOutcome::failure(INCOMPLETE_CODE);
        }

        match self.controller.api().verify(&email, code).await {
            Ok(message) if message.to_lowercase().contains("verified") => {
                self.mark(VERIFIED_EMAIL_KEY, &email);
                tracing::info!("email verified");
                ActionOutcome::success_with(message)
            }
            Ok(_) => ActionOutcome::failure(INVALID_CODE),
            Err(e) => {
                tracing::warn!(error = %e, "verification failed");
                ActionOutcome::failure(e.payload_text().unwrap_or_else(|| VERIFY_FAILED.to_owned()))
            }
        }
    }

    /// Set the first password for `email` (or the verified email), then
    /// clear the onboarding markers and sign in.
    ///
    /// # Errors
    ///
    /// Returns the failing fields without calling the API.
    pub async fn set_password(
        &mut self,
        email: Option<&str>,
        password: &str,
        confirm: &str,
    ) -> Result<SetPasswordOutcome, FieldErrors> {
        let Some(email) = email.map(str::to_owned).or_else(|| self.verified_email()) else {
            return Ok(SetPasswordOutcome { outcome: ActionOutcome::failure(EMAIL_NOT_VERIFIED), logged_in: false });
        };
        validate::password_pair(password, confirm)?;

        let message = match self.controller.api().set_password(&email, password).await {
            Ok(message) if message.to_lowercase().contains("successfully") => message,
            Ok(_) => {
                return Ok(SetPasswordOutcome { outcome: ActionOutcome::failure(SET_PASSWORD_REJECTED), logged_in: false });
            }
            Err(e) => {
                tracing::warn!(error = %e, "set password failed");
                let error = e.payload_text().unwrap_or_else(|| SET_PASSWORD_FAILED.to_owned());
                return Ok(SetPasswordOutcome { outcome: ActionOutcome::failure(error), logged_in: false });
            }
        };

        self.clear_markers();
        let login = self.controller.login(&email, password).await;
        if let Some(error) = login.error() {
            tracing::warn!(%error, "automatic login after set password failed");
        }
        Ok(SetPasswordOutcome { outcome: ActionOutcome::success_with(message), logged_in: login.is_success() })
    }

    /// Forget any half-finished sign-up.
    pub fn clear_markers(&mut self) {
        self.unmark(VERIFIED_EMAIL_KEY);
        self.unmark(PENDING_EMAIL_KEY);
    }

    fn mark(&mut self, key: &str, value: &str) {
        if let Err(e) = self.controller.store_mut().set(key, value) {
            tracing::warn!(%key, error = %e, "onboarding marker write failed");
        }
    }

    fn unmark(&mut self, key: &str) {
        if let Err(e) = self.controller.store_mut().remove(key) {
            tracing::warn!(%key, error = %e, "onboarding marker remove failed");
        }
    }
}

#[cfg(test)]
#[path = "onboarding_test.rs"]
mod tests;
