//! HTTP client for the OneNote endpoints of Microsoft Graph.
//!
//! The client holds no credentials; every call takes the bearer token to use, so a
//! re-authenticated token takes effect on the very next request.

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use super::types::{CreatedPage, GraphList, Notebook, Section};
use crate::auth::Token;
use crate::models::ItemError;

/// Default Graph API root.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: token missing, expired or revoked")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),
}

impl From<ClientError> for ItemError {
    fn from(e: ClientError) -> Self {
        let detail = e.to_string();
        match e {
            ClientError::Unauthorized => ItemError::AuthExpired(detail),
            ClientError::NotFound(_)
            | ClientError::BadRequest(_)
            | ClientError::Forbidden(_)
            | ClientError::InvalidResponse(_) => ItemError::RemoteRejected(detail),
            ClientError::Http(_) | ClientError::RateLimited(_) | ClientError::Server(_) => {
                ItemError::Transient(detail)
            }
        }
    }
}

/// HTTP client for Microsoft Graph OneNote.
#[derive(Debug, Clone)]
pub struct GraphClient {
    base_url: String,
    client: Client,
}

impl GraphClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Build an authorized request.
    fn request(&self, method: reqwest::Method, path: &str, token: &Token) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url).bearer_auth(token.bearer())
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ClientError {
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT => ClientError::BadRequest(body),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(body),
            StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited(body),
            s if s.is_client_error() => ClientError::BadRequest(format!("{}: {}", s, body)),
            s => ClientError::Server(format!("{}: {}", s, body)),
        }
    }

    // ============================================================
    // Containers
    // ============================================================

    /// List the signed-in user's notebooks.
    pub async fn list_notebooks(&self, token: &Token) -> Result<Vec<Notebook>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/me/onenote/notebooks", token)
            .send()
            .await?;
        let list: GraphList<Notebook> = self.handle_response(response).await?;
        Ok(list.value)
    }

    /// List the sections of a notebook.
    pub async fn list_sections(
        &self,
        token: &Token,
        notebook_id: &str,
    ) -> Result<Vec<Section>, ClientError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/me/onenote/notebooks/{}/sections", notebook_id),
                token,
            )
            .send()
            .await?;
        let list: GraphList<Section> = self.handle_response(response).await?;
        Ok(list.value)
    }

    /// Find a notebook by display name, ignoring case.
    pub async fn find_notebook_by_name(
        &self,
        token: &Token,
        name: &str,
    ) -> Result<Option<Notebook>, ClientError> {
        let notebooks = self.list_notebooks(token).await?;
        Ok(notebooks
            .into_iter()
            .find(|n| n.display_name.eq_ignore_ascii_case(name)))
    }

    /// Find a section of a notebook by display name, ignoring case.
    pub async fn find_section_by_name(
        &self,
        token: &Token,
        notebook_id: &str,
        name: &str,
    ) -> Result<Option<Section>, ClientError> {
        let sections = self.list_sections(token, notebook_id).await?;
        Ok(sections
            .into_iter()
            .find(|s| s.display_name.eq_ignore_ascii_case(name)))
    }

    // ============================================================
    // Pages
    // ============================================================

    /// Create a page from a complete HTML document.
    ///
    /// A 2xx status means the page exists. If its body cannot be read the page is still
    /// reported as created, identified by the `Location` header when there is one.
    pub async fn create_page(
        &self,
        token: &Token,
        section_id: &str,
        html: String,
    ) -> Result<CreatedPage, ClientError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/me/onenote/sections/{}/pages", section_id),
                token,
            )
            .header(CONTENT_TYPE, "text/html")
            .body(html)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let decoded = match response.text().await {
            Ok(body) => serde_json::from_str::<CreatedPage>(&body).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        Ok(decoded.unwrap_or_else(|e| {
            warn!("Page created but its response could not be read: {}", e);
            CreatedPage::from_location(location.as_deref())
        }))
    }
}
