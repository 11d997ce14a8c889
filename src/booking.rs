//! Browsing and enrollment for classes and one-time sessions.
//!
//! Listing and detail calls are anonymous and hand `ApiError` back to the
//! caller. Enrollment needs a signed-in session and reports through
//! `ActionOutcome` like the other controller operations.

use crate::api::{ApiError, BookingApi, OneTimeSession, RegularClass};
use crate::session::{ActionOutcome, SessionController};
use crate::store::SessionStore;

pub const CLASS_LOGIN_REQUIRED: &str = "Please login to enroll in classes";
pub const SESSION_LOGIN_REQUIRED: &str = "Please login to enroll in sessions";
pub const ENROLL_FAILED: &str = "Enrollment failed. Please try again.";
pub const ENROLL_SUCCEEDED: &str = "Successfully enrolled! Check your email for confirmation.";

/// # Errors
///
/// Returns the transport or API error unchanged.
pub async fn list_classes<A: BookingApi, S: SessionStore>(
    session: &SessionController<A, S>,
) -> Result<Vec<RegularClass>, ApiError> {
    session.api().list_classes().await
}

/// # Errors
///
/// Returns the transport or API error unchanged.
pub async fn get_class<A: BookingApi, S: SessionStore>(
    session: &SessionController<A, S>,
    id: i64,
) -> Result<RegularClass, ApiError> {
    session.api().get_class(id).await
}

/// # Errors
///
/// Returns the transport or API error unchanged.
pub async fn list_sessions<A: BookingApi, S: SessionStore>(
    session: &SessionController<A, S>,
) -> Result<Vec<OneTimeSession>, ApiError> {
    session.api().list_sessions().await
}

/// # Errors
///
/// Returns the transport or API error unchanged.
pub async fn get_session<A: BookingApi, S: SessionStore>(
    session: &SessionController<A, S>,
    id: i64,
) -> Result<OneTimeSession, ApiError> {
    session.api().get_session(id).await
}

pub async fn enrol_class<A: BookingApi, S: SessionStore>(session: &SessionController<A, S>, id: i64) -> ActionOutcome {
    let Some(token) = session.token() else {
        return ActionOutcome::failure(CLASS_LOGIN_REQUIRED);
    };
    enrolment_outcome("class", id, session.api().enrol_class(token, id).await)
}

pub async fn enrol_session<A: BookingApi, S: SessionStore>(
    session: &SessionController<A, S>,
    id: i64,
) -> ActionOutcome {
    let Some(token) = session.token() else {
        return ActionOutcome::failure(SESSION_LOGIN_REQUIRED);
    };
    enrolment_outcome("session", id, session.api().enrol_session(token, id).await)
}

fn enrolment_outcome(kind: &'static str, id: i64, result: Result<String, ApiError>) -> ActionOutcome {
    match result {
        Ok(message) => {
            tracing::info!(kind, id, "enrolled");
            let message = if message.is_empty() { ENROLL_SUCCEEDED.to_owned() } else { message };
            ActionOutcome::success_with(message)
        }
        Err(e) => {
            tracing::warn!(kind, id, error = %e, "enrollment failed");
            ActionOutcome::failure(e.payload_text().unwrap_or_else(|| ENROLL_FAILED.to_owned()))
        }
    }
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;
