//! `reqwest` transport for the booking API.
//!
//! Every call is a single request: no retries, no caching. Non-2xx responses
//! become [`ApiError::Status`] carrying the raw body so callers can pick the
//! user-facing message out of it.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{LoginResponse, OneTimeSession, ProfileUpdate, RegistrationRequest, RegularClass, UserProfile};
use super::{ApiError, BookingApi, response_text};
use crate::config::{ClientConfig, Timeouts};

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const VERIFY_PATH: &str = "/api/auth/verify";
pub const SET_PASSWORD_PATH: &str = "/api/auth/set-password";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const PROFILE_PATH: &str = "/api/user/profile";
pub const PROFILE_UPDATE_PATH: &str = "/api/user/profile/update";
pub const CLASS_LIST_PATH: &str = "/api/regularClass/viewRegularClassList";
pub const SESSION_LIST_PATH: &str = "/api/oneTimeSession/viewOneTimeSessionList";

#[must_use]
pub fn class_path(id: i64) -> String {
    format!("/api/regularClass/viewRegularClass/{id}")
}

#[must_use]
pub fn enrol_class_path(id: i64) -> String {
    format!("/api/regularClass/enrolRegularClass/{id}")
}

#[must_use]
pub fn session_path(id: i64) -> String {
    format!("/api/oneTimeSession/viewOneTimeSession/{id}")
}

#[must_use]
pub fn enrol_session_path(id: i64) -> String {
    format!("/api/oneTimeSession/enrolSession/{id}")
}

#[derive(Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

/// HTTP client bound to one API base URL.
#[derive(Clone, Debug)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client for `base_url` with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %path, authenticated = token.is_some(), "api request");
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "api error response");
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let text = self.send(builder).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_text(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let text = self.send(builder).await?;
        Ok(response_text(&text))
    }
}

#[async_trait::async_trait]
impl BookingApi for HttpApi {
    async fn register(&self, request: &RegistrationRequest) -> Result<String, ApiError> {
        let builder = self.request(Method::POST, REGISTER_PATH, None).json(request);
        self.send_text(builder).await
    }

    async fn verify(&self, email: &str, code: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, VERIFY_PATH, None)
            .query(&[("email", email)])
            .json(&CodeBody { code });
        self.send_text(builder).await
    }

    async fn set_password(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, SET_PASSWORD_PATH, None)
            .query(&[("email", email)])
            .json(&PasswordBody { password });
        self.send_text(builder).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let builder = self
            .request(Method::POST, LOGIN_PATH, None)
            .query(&[("email", email)])
            .json(&PasswordBody { password });
        self.send_json(builder).await
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let builder = self.request(Method::GET, PROFILE_PATH, Some(token));
        self.send_json(builder).await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<String, ApiError> {
        let builder = self
            .request(Method::PUT, PROFILE_UPDATE_PATH, Some(token))
            .json(update);
        self.send_text(builder).await
    }

    async fn list_classes(&self) -> Result<Vec<RegularClass>, ApiError> {
        self.send_json(self.request(Method::GET, CLASS_LIST_PATH, None))
            .await
    }

    async fn get_class(&self, id: i64) -> Result<RegularClass, ApiError> {
        self.send_json(self.request(Method::GET, &class_path(id), None))
            .await
    }

    async fn enrol_class(&self, token: &str, id: i64) -> Result<String, ApiError> {
        self.send_text(self.request(Method::POST, &enrol_class_path(id), Some(token)))
            .await
    }

    async fn list_sessions(&self) -> Result<Vec<OneTimeSession>, ApiError> {
        self.send_json(self.request(Method::GET, SESSION_LIST_PATH, None))
            .await
    }

    async fn get_session(&self, id: i64) -> Result<OneTimeSession, ApiError> {
        self.send_json(self.request(Method::GET, &session_path(id), None))
            .await
    }

    async fn enrol_session(&self, token: &str, id: i64) -> Result<String, ApiError> {
        self.send_text(self.request(Method::POST, &enrol_session_path(id), Some(token)))
            .await
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
