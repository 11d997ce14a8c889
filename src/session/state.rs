//! Auth-session state for the current client user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front ends read this to decide what to render and when auth is settled:
//! nothing should treat the session as authoritative while `is_loading` is
//! still true.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::api::UserProfile;

/// Where the session sits in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Constructed, store not read yet.
    #[default]
    Uninitialized,
    /// Store read in progress or profile refresh pending.
    Initializing,
    Authenticated,
    Anonymous,
}

/// Provenance of the in-memory profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileStatus {
    #[default]
    Missing,
    /// Restored from the persisted store, not yet confirmed by the API.
    Cached,
    /// Fetched from the API during this run.
    Confirmed,
}

/// Client-held record of whether a user is signed in and who they are.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub phase: SessionPhase,
    pub profile: ProfileStatus,
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { token: None, user: None, phase: SessionPhase::Uninitialized, profile: ProfileStatus::Missing, is_loading: true }
    }
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop credentials and profile, keeping `is_loading` as is.
    pub(crate) fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.profile = ProfileStatus::Missing;
        self.phase = SessionPhase::Anonymous;
    }
}

/// Result of a session or booking action, ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Success { message: Option<String> },
    Failure { error: String },
}

impl ActionOutcome {
    #[must_use]
    pub fn success() -> Self {
        Self::Success { message: None }
    }

    #[must_use]
    pub fn success_with(message: impl Into<String>) -> Self {
        Self::Success { message: Some(message.into()) }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure { error: error.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message } => message.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}
