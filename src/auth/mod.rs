//! Bearer token acquisition for Microsoft Graph.
//!
//! [`AuthProvider`] is the seam the import workflow depends on. [`DeviceCodeAuth`] is
//! the real implementation: it serves tokens from an on-disk [`TokenCache`], refreshes
//! them when they lapse, and falls back to an interactive device-code sign-in.

mod cache;
mod device_code;

pub use cache::*;
pub use device_code::*;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

/// An OAuth access token with its expiry.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub refresh_token: Option<String>,
}

impl Token {
    pub fn new(access_token: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
            refresh_token: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }

    pub fn bearer(&self) -> &str {
        &self.access_token
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at - Duration::seconds(EXPIRY_SKEW_SECS) <= Utc::now()
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Failures acquiring a token. Fatal to starting a pass until the caller resolves them.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sign-in was declined: {0}")]
    Denied(String),

    #[error("Sign-in code expired before it was used")]
    CodeExpired,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Token cache error: {0}")]
    Cache(String),
}

/// Something that can hand out bearer tokens.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Return a usable token.
    ///
    /// With `force_interactive == false` the cached token is tried first. With `true`
    /// a fresh interactive sign-in always runs and replaces whatever was cached.
    async fn get_token(&self, force_interactive: bool) -> Result<Token, AuthError>;
}
