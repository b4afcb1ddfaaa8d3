use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validation::{looks_like_email, FieldErrors};

/// The signed-in user, as returned by `GET /profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Envelope of `GET /profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    pub data: User,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if self.email.is_empty() {
            errors.add("email", "Email is required.");
        } else {
            errors.check(looks_like_email(&self.email), "email", "Enter a valid email address.");
        }
        errors.check(!self.password.is_empty(), "password", "Password is required.");
        errors.into_result()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful reply of `POST /auth/login`.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// An authenticated session held by the client.
///
/// This is the only state kept between calls. It can be sealed to bytes with
/// [`crate::storage::vault`] to survive a process restart.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
            signed_in_at: Utc::now(),
        }
    }

    /// Request context carrying this session's bearer token.
    pub fn context(&self) -> RequestContext {
        RequestContext::with_token(self.token.clone())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}

/// Per-request credentials, passed explicitly to every backend call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    bearer_token: Option<String>,
}

impl RequestContext {
    /// A context with no credentials (login, public catalog).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
