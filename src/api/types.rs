//! Wire DTOs for the booking API.
//!
//! DESIGN
//! ======
//! Field names follow the remote API's camelCase JSON. Records owned by the
//! remote system keep unknown fields in `extra` so a locally cached copy
//! serializes back without loss.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signed-in user's account record as returned by `/api/user/profile`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Remote identifier, if the API exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Height in centimetres.
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    /// `yyyy-MM-dd`.
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// `"First Last"`, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}

/// Partial profile update; absent fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: String,
}

/// Success body of `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recurring class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularClass {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text schedule, e.g. `"Mondays 18:00"`.
    #[serde(default)]
    pub date_and_time: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Spots already taken.
    #[serde(default)]
    pub current_number: u32,
    /// Capacity.
    #[serde(default)]
    pub max_number: u32,
}

/// A one-off session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeSession {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `yyyy-MM-dd`.
    #[serde(default)]
    pub date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`, 24-hour.
    #[serde(default)]
    pub time: Option<String>,
    /// `"Online"`, `"In-Person"`, or legacy tags like `"On-Premise"`.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub current_number: u32,
    #[serde(default)]
    pub max_number: u32,
}
