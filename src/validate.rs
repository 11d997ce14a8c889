//! Form validation run before any network call.
//!
//! Field keys match the remote API's camelCase names so a front end can map
//! messages straight onto its inputs.

use std::fmt;

use crate::api::{ProfileUpdate, RegistrationRequest};
use crate::format::parse_api_date;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Per-field validation messages, in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`; the first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (*name, message.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// `local@domain.tld` with no whitespace and a single `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, message);
        return false;
    }
    true
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if require(errors, "email", email, "Email is required") && !is_valid_email(email.trim()) {
        errors.add("email", "Invalid email address");
    }
}

/// Validate the sign-up form.
///
/// # Errors
///
/// Returns the failing fields.
pub fn registration(request: &RegistrationRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "firstName", &request.first_name, "First name is required");
    require(&mut errors, "lastName", &request.last_name, "Last name is required");
    check_email(&mut errors, &request.email);
    require(&mut errors, "phoneNumber", &request.phone_number, "Phone number is required");
    if require(&mut errors, "dateOfBirth", &request.date_of_birth, "Date of birth is required")
        && parse_api_date(&request.date_of_birth).is_none()
    {
        errors.add("dateOfBirth", "Invalid date of birth");
    }
    errors.into_result()
}

/// Validate the login form.
///
/// # Errors
///
/// Returns the failing fields.
pub fn login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

/// Validate a new password and its confirmation.
///
/// # Errors
///
/// Returns the failing fields.
pub fn password_pair(password: &str, confirm: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if !is_valid_password(password) {
        errors.add("password", "Password must be at least 8 characters long");
    }
    if confirm.is_empty() {
        errors.add("confirmPassword", "Please confirm your password");
    } else if password != confirm {
        errors.add("confirmPassword", "Passwords do not match");
    }
    errors.into_result()
}

/// Validate the fields present in a profile update.
///
/// # Errors
///
/// Returns the failing fields.
pub fn profile_update(update: &ProfileUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(first_name) = &update.first_name {
        require(&mut errors, "firstName", first_name, "First name is required");
    }
    if let Some(last_name) = &update.last_name {
        require(&mut errors, "lastName", last_name, "Last name is required");
    }
    if let Some(email) = &update.email {
        check_email(&mut errors, email);
    }
    if let Some(phone) = &update.phone_number {
        require(&mut errors, "phoneNumber", phone, "Phone number is required");
    }
    if update.height.is_some_and(|h| !h.is_finite() || h <= 0.0) {
        errors.add("height", "Height must be a positive number");
    }
    if update.weight.is_some_and(|w| !w.is_finite() || w <= 0.0) {
        errors.add("weight", "Weight must be a positive number");
    }
    if let Some(dob) = &update.date_of_birth {
        if parse_api_date(dob).is_none() {
            errors.add("dateOfBirth", "Invalid date of birth");
        }
    }
    errors.into_result()
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
