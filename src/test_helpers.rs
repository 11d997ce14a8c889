//! Scripted in-memory stand-in for the remote booking API.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::api::{
    ApiError, BookingApi, LoginResponse, OneTimeSession, ProfileUpdate, RegistrationRequest, RegularClass, UserProfile,
};
use crate::session::SessionController;
use crate::store::{AUTH_TOKEN_KEY, MemoryStore, USER_KEY};

pub const GOOD_TOKEN: &str = "tok-good";
pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct-horse";
pub const VERIFY_CODE: &str = "123456";

/// Canned failure for a mock endpoint.
#[derive(Clone, Debug)]
pub enum Failure {
    Status(u16, &'static str),
    Transport,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Self::Status(status, body) => ApiError::Status { status: *status, body: (*body).to_owned() },
            Self::Transport => ApiError::Transport("connection refused".into()),
        }
    }
}

pub struct MockApi {
    /// Endpoint names in call order.
    pub calls: Mutex<Vec<&'static str>>,
    pub passwords: Mutex<HashMap<String, String>>,
    pub registered: Mutex<HashSet<String>>,
    pub verified: Mutex<HashSet<String>>,
    pub profile: Mutex<UserProfile>,
    pub profile_failure: Mutex<Option<Failure>>,
    pub update_failure: Mutex<Option<Failure>>,
    pub enrol_failure: Mutex<Option<Failure>>,
    pub classes: Vec<RegularClass>,
    pub sessions: Vec<OneTimeSession>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            passwords: Mutex::new(HashMap::from([(EMAIL.to_owned(), PASSWORD.to_owned())])),
            registered: Mutex::new(HashSet::new()),
            verified: Mutex::new(HashSet::new()),
            profile: Mutex::new(sample_profile()),
            profile_failure: Mutex::new(None),
            update_failure: Mutex::new(None),
            enrol_failure: Mutex::new(None),
            classes: vec![sample_class(1, "Boxing Fundamentals"), sample_class(2, "Kettlebell Flow")],
            sessions: vec![sample_session(10, "Open Gym", Some("Online"))],
        }
    }
}

impl MockApi {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_profile(&self, failure: Failure) {
        *self.profile_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_update(&self, failure: Failure) {
        *self.update_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_enrol(&self, failure: Failure) {
        *self.enrol_failure.lock().unwrap() = Some(failure);
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_token(token: &str) -> Result<(), ApiError> {
        if token == GOOD_TOKEN {
            Ok(())
        } else {
            Err(ApiError::Status { status: 401, body: String::new() })
        }
    }

    fn injected(slot: &Mutex<Option<Failure>>) -> Result<(), ApiError> {
        match slot.lock().unwrap().as_ref() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl BookingApi for MockApi {
    async fn register(&self, request: &RegistrationRequest) -> Result<String, ApiError> {
        self.record("register");
        if self.passwords.lock().unwrap().contains_key(&request.email) {
            return Err(Failure::Status(409, r#"{"message":"Email already registered"}"#).to_error());
        }
        self.registered.lock().unwrap().insert(request.email.clone());
        Ok("User registered successfully. Please check your email for verification code.".into())
    }

    async fn verify(&self, email: &str, code: &str) -> Result<String, ApiError> {
        self.record("verify");
        if code == VERIFY_CODE && self.registered.lock().unwrap().contains(email) {
            self.verified.lock().unwrap().insert(email.to_owned());
            Ok("Email verified successfully".into())
        } else {
            Err(Failure::Status(400, "Invalid or expired code").to_error())
        }
    }

    async fn set_password(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.record("set_password");
        if !self.verified.lock().unwrap().contains(email) {
            return Err(Failure::Status(400, "Email not verified").to_error());
        }
        self.passwords.lock().unwrap().insert(email.to_owned(), password.to_owned());
        Ok("Password set successfully".into())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.record("login");
        if self.passwords.lock().unwrap().get(email).map(String::as_str) == Some(password) {
            self.profile.lock().unwrap().email = email.to_owned();
            Ok(LoginResponse { token: GOOD_TOKEN.into(), extra: serde_json::Map::new() })
        } else {
            Err(Failure::Status(401, r#"{"error":"Invalid email or password"}"#).to_error())
        }
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.record("get_profile");
        Self::injected(&self.profile_failure)?;
        Self::check_token(token)?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<String, ApiError> {
        self.record("update_profile");
        Self::injected(&self.update_failure)?;
        Self::check_token(token)?;
        let mut profile = self.profile.lock().unwrap();
        if let Some(v) = &update.first_name {
            profile.first_name.clone_from(v);
        }
        if let Some(v) = &update.last_name {
            profile.last_name.clone_from(v);
        }
        if let Some(v) = &update.phone_number {
            profile.phone_number = Some(v.clone());
        }
        if let Some(v) = update.weight {
            profile.weight = Some(v);
        }
        Ok("Profile updated successfully".into())
    }

    async fn list_classes(&self) -> Result<Vec<RegularClass>, ApiError> {
        self.record("list_classes");
        Ok(self.classes.clone())
    }

    async fn get_class(&self, id: i64) -> Result<RegularClass, ApiError> {
        self.record("get_class");
        self.classes
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Failure::Status(404, "Class not found").to_error())
    }

    async fn enrol_class(&self, token: &str, _id: i64) -> Result<String, ApiError> {
        self.record("enrol_class");
        Self::injected(&self.enrol_failure)?;
        Self::check_token(token)?;
        Ok(String::new())
    }

    async fn list_sessions(&self) -> Result<Vec<OneTimeSession>, ApiError> {
        self.record("list_sessions");
        Ok(self.sessions.clone())
    }

    async fn get_session(&self, id: i64) -> Result<OneTimeSession, ApiError> {
        self.record("get_session");
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Failure::Status(404, "Session not found").to_error())
    }

    async fn enrol_session(&self, token: &str, id: i64) -> Result<String, ApiError> {
        self.record("enrol_session");
        Self::injected(&self.enrol_failure)?;
        Self::check_token(token)?;
        Ok(format!("Enrolled in session {id}"))
    }
}

#[must_use]
pub fn sample_profile() -> UserProfile {
    UserProfile {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: EMAIL.into(),
        phone_number: Some("07700 900000".into()),
        ..UserProfile::default()
    }
}

#[must_use]
pub fn sample_class(id: i64, name: &str) -> RegularClass {
    RegularClass {
        id,
        name: name.to_owned(),
        short_description: None,
        description: None,
        date_and_time: Some("Mondays 18:00".into()),
        price: 12.0,
        current_number: 3,
        max_number: 10,
    }
}

#[must_use]
pub fn sample_session(id: i64, name: &str, mode: Option<&str>) -> OneTimeSession {
    OneTimeSession {
        id,
        name: name.to_owned(),
        short_description: None,
        description: None,
        date: Some("2025-06-01".into()),
        time: Some("09:30:00".into()),
        mode: mode.map(str::to_owned),
        location: None,
        price: 15.0,
        current_number: 1,
        max_number: 6,
    }
}

/// Controller with a default mock API and an empty store.
#[must_use]
pub fn controller() -> SessionController<MockApi, MemoryStore> {
    SessionController::new(MockApi::default(), MemoryStore::new())
}

/// Controller whose store already holds `token` and a cached profile.
#[must_use]
pub fn restored_controller(token: &str, cached: &UserProfile) -> SessionController<MockApi, MemoryStore> {
    let raw = serde_json::to_string(cached).unwrap();
    let store = MemoryStore::with_entries([(AUTH_TOKEN_KEY, token), (USER_KEY, raw.as_str())]);
    SessionController::new(MockApi::default(), store)
}
