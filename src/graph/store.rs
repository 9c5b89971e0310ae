use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::{page_html, GraphClient, PageStore};
use crate::auth::Token;
use crate::models::{ItemError, RemotePageRef};

/// [`PageStore`] that creates every page in one OneNote section.
///
/// OneNote sections hold a flat page list, so a lesson page lands in the same section
/// as its parent and links back to the parent page.
#[derive(Debug, Clone)]
pub struct GraphPageStore {
    client: GraphClient,
    section_id: String,
}

impl GraphPageStore {
    pub fn new(client: GraphClient, section_id: impl Into<String>) -> Self {
        Self {
            client,
            section_id: section_id.into(),
        }
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }
}

#[async_trait]
impl PageStore for GraphPageStore {
    async fn create_page(
        &self,
        token: &Token,
        parent: Option<&RemotePageRef>,
        title: &str,
        content: &str,
    ) -> Result<RemotePageRef, ItemError> {
        let html = page_html(
            title,
            content,
            parent.map(|p| (p.title.as_str(), p.web_url.as_deref())),
            Utc::now(),
        );

        let page = self
            .client
            .create_page(token, &self.section_id, html)
            .await?;
        debug!("Created page '{}' ({})", title, page.id);

        Ok(RemotePageRef {
            web_url: page.web_url().map(str::to_string),
            title: page.title.clone().unwrap_or_else(|| title.to_string()),
            id: page.id,
        })
    }
}
