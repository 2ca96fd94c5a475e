//! Wire shapes of the identity API.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// User profile as returned by `/api/users/me` and embedded in auth
/// responses. Display-only; the server remains authoritative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub provider: Option<String>,
    pub exclusive_access: bool,
    pub created_at: Option<String>,
}

/// Body of a successful login, sign-up or OAuth code exchange.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Kept opaque so it can be stored verbatim in the page-only tier.
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    #[serde(rename = "acceptTerms")]
    pub accept_terms: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeRequest {
    pub email: String,
}

/// Body of `/api/auth/request-code`. The API may answer with `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodeResponse {
    pub message: Option<String>,
    pub code_sent: bool,
}

/// Third-party identity providers offered on the sign-in and sign-up pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Apple,
}

impl OAuthProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Apple => "Apple",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
