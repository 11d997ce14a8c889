//! Persisted key/value session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the bearer token, the cached profile, and onboarding markers between
//! runs. Values are plain strings; the profile is stored as JSON text. There
//! is no locking or expiry: the last writer wins and a stale token survives
//! until logout or a 401 from the API.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Bearer token from the last successful login.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// JSON-serialized [`crate::api::UserProfile`].
pub const USER_KEY: &str = "user";
/// Email awaiting its verification code.
pub const PENDING_EMAIL_KEY: &str = "pendingEmail";
/// Email verified but still without a password.
pub const VERIFIED_EMAIL_KEY: &str = "verifiedEmail";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage backing a session.
pub trait SessionStore {
    /// Current value for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
