//! OAuth 2.0 device authorization grant against the Microsoft identity platform.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{AuthError, AuthProvider, Token, TokenCache};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// What the user must do to finish an interactive sign-in.
#[derive(Debug, Clone)]
pub struct DeviceCodePrompt {
    pub verification_uri: String,
    pub user_code: String,
    /// Ready-made instruction text from the identity platform.
    pub message: Option<String>,
}

/// Callback that shows a [`DeviceCodePrompt`] to the user.
pub type PromptSink = Arc<dyn Fn(&DeviceCodePrompt) + Send + Sync>;

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    expires_in: u64,
    #[serde(default)]
    interval: Option<u64>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Auth provider backed by a token cache, refresh tokens and device-code sign-in.
#[derive(Clone)]
pub struct DeviceCodeAuth {
    /// e.g. `https://login.microsoftonline.com/common`
    authority: String,
    client_id: String,
    scopes: Vec<String>,
    cache: TokenCache,
    prompt: PromptSink,
    /// Poll interval when the platform names none, and the back-off added on `slow_down`.
    poll_step: Duration,
    client: reqwest::Client,
}

impl DeviceCodeAuth {
    pub fn new(
        authority: impl Into<String>,
        client_id: impl Into<String>,
        scopes: Vec<String>,
        cache: TokenCache,
        prompt: PromptSink,
    ) -> Self {
        Self {
            authority: authority.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            scopes,
            cache,
            prompt,
            poll_step: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_poll_step(mut self, step: Duration) -> Self {
        self.poll_step = step;
        self
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/oauth2/v2.0/{}", self.authority, name)
    }

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<Token, AuthError> {
        let scope = self.scope();
        let response = self
            .client
            .post(self.endpoint("token"))
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh_token),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let body: TokenResponse = response.json().await?;
            Ok(into_token(body, Some(refresh_token)))
        } else {
            let body: ErrorResponse = response.json().await?;
            Err(AuthError::Provider(describe(&body)))
        }
    }

    /// Run a full device-code sign-in.
    async fn sign_in(&self) -> Result<Token, AuthError> {
        let scope = self.scope();
        let response = self
            .client
            .post(self.endpoint("devicecode"))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let body: ErrorResponse = response.json().await?;
            return Err(AuthError::Provider(describe(&body)));
        }
        let flow: DeviceCodeResponse = response.json().await?;

        (self.prompt)(&DeviceCodePrompt {
            verification_uri: flow.verification_uri.clone(),
            user_code: flow.user_code.clone(),
            message: flow.message.clone(),
        });

        let mut interval = flow.interval.map_or(self.poll_step, Duration::from_secs);
        let deadline = tokio::time::Instant::now() + Duration::from_secs(flow.expires_in);

        loop {
            tokio::time::sleep(interval).await;
            if tokio::time::Instant::now() >= deadline {
                return Err(AuthError::CodeExpired);
            }

            let response = self
                .client
                .post(self.endpoint("token"))
                .form(&[
                    ("grant_type", DEVICE_CODE_GRANT),
                    ("client_id", self.client_id.as_str()),
                    ("device_code", flow.device_code.as_str()),
                ])
                .send()
                .await?;

            if response.status().is_success() {
                let body: TokenResponse = response.json().await?;
                return Ok(into_token(body, None));
            }

            let body: ErrorResponse = response.json().await?;
            match body.error.as_str() {
                "authorization_pending" => continue,
                "slow_down" => {
                    interval += self.poll_step;
                    debug!("Identity platform asked to slow down, polling every {:?}", interval);
                }
                "expired_token" | "code_expired" => return Err(AuthError::CodeExpired),
                "access_denied" | "authorization_declined" => {
                    return Err(AuthError::Denied(describe(&body)))
                }
                _ => return Err(AuthError::Provider(describe(&body))),
            }
        }
    }

    fn store(&self, token: Token) -> Result<Token, AuthError> {
        self.cache.save(&token)?;
        Ok(token)
    }
}

#[async_trait]
impl AuthProvider for DeviceCodeAuth {
    async fn get_token(&self, force_interactive: bool) -> Result<Token, AuthError> {
        if !force_interactive {
            if let Some(cached) = self.cache.load() {
                if !cached.is_expired() {
                    debug!("Using cached token");
                    return Ok(cached);
                }
                if let Some(ref refresh_token) = cached.refresh_token {
                    match self.refresh(refresh_token).await {
                        Ok(token) => {
                            info!("Refreshed access token");
                            return self.store(token);
                        }
                        Err(e) => warn!("Token refresh failed, signing in again: {}", e),
                    }
                }
            }
        }

        info!("Starting interactive sign-in");
        let token = self.sign_in().await?;
        self.store(token)
    }
}

fn into_token(body: TokenResponse, previous_refresh: Option<&str>) -> Token {
    // Refresh responses may omit a new refresh token; keep the old one then.
    let refresh_token = body
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_string));
    Token::new(body.access_token, body.expires_in).with_refresh_token(refresh_token)
}

fn describe(body: &ErrorResponse) -> String {
    match body.error_description {
        Some(ref description) => format!("{}: {}", body.error, description),
        None => body.error.clone(),
    }
}
