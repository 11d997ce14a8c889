//! Remote booking API: contract, wire types, and errors.
//!
//! DESIGN
//! ======
//! The remote service owns all business logic. This module only describes
//! the calls the client makes. `BookingApi` is the seam: the HTTP transport
//! in [`http`] implements it for real traffic and tests substitute mocks.
//! Calls that need a signed-in user take the bearer token explicitly so no
//! ambient credential state lives in the transport.

pub mod http;
pub mod types;

use serde_json::Value;

pub use types::{
    LoginResponse, OneTimeSession, ProfileUpdate, RegistrationRequest, RegularClass, UserProfile,
};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by remote API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("API request failed: {0}")]
    Transport(String),

    /// The remote API returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// A success response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// True when the remote API rejected the credentials (HTTP 401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Named string field of a JSON error payload, when present and non-empty.
    #[must_use]
    pub fn payload_field(&self, field: &str) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let value = serde_json::from_str::<Value>(body).ok()?;
        non_empty(value.get(field)?.as_str()?)
    }

    /// Best-effort human-readable error payload.
    ///
    /// Plain-text bodies and JSON strings are returned as-is; JSON objects
    /// yield their `message` or `error` field.
    #[must_use]
    pub fn payload_text(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        match serde_json::from_str::<Value>(body) {
            Ok(Value::String(text)) => non_empty(&text),
            Ok(Value::Object(_)) => self
                .payload_field("message")
                .or_else(|| self.payload_field("error")),
            Ok(_) => None,
            Err(_) => non_empty(body),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Normalize a text-ish success body: JSON strings are unwrapped, anything
/// else is returned trimmed.
#[must_use]
pub fn response_text(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => text,
        _ => body.trim().to_owned(),
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Calls the booking client makes against the remote API.
#[async_trait::async_trait]
pub trait BookingApi: Send + Sync {
    /// `POST /api/auth/register`.
    async fn register(&self, request: &RegistrationRequest) -> Result<String, ApiError>;

    /// `POST /api/auth/verify?email=` with `{code}`.
    async fn verify(&self, email: &str, code: &str) -> Result<String, ApiError>;

    /// `POST /api/auth/set-password?email=` with `{password}`.
    async fn set_password(&self, email: &str, password: &str) -> Result<String, ApiError>;

    /// `POST /api/auth/login?email=` with `{password}`.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// `GET /api/user/profile`.
    async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError>;

    /// `PUT /api/user/profile/update`.
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<String, ApiError>;

    /// `GET /api/regularClass/viewRegularClassList`.
    async fn list_classes(&self) -> Result<Vec<RegularClass>, ApiError>;

    /// `GET /api/regularClass/viewRegularClass/{id}`.
    async fn get_class(&self, id: i64) -> Result<RegularClass, ApiError>;

    /// `POST /api/regularClass/enrolRegularClass/{id}`.
    async fn enrol_class(&self, token: &str, id: i64) -> Result<String, ApiError>;

    /// `GET /api/oneTimeSession/viewOneTimeSessionList`.
    async fn list_sessions(&self) -> Result<Vec<OneTimeSession>, ApiError>;

    /// `GET /api/oneTimeSession/viewOneTimeSession/{id}`.
    async fn get_session(&self, id: i64) -> Result<OneTimeSession, ApiError>;

    /// `POST /api/oneTimeSession/enrolSession/{id}`.
    async fn enrol_session(&self, token: &str, id: i64) -> Result<String, ApiError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
