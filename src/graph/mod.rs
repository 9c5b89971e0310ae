//! Remote page store: Microsoft Graph OneNote API.
//!
//! [`PageStore`] is the seam the executor talks to. [`GraphPageStore`] implements it on
//! top of [`GraphClient`], creating every page in one destination OneNote section.

mod client;
mod page;
mod store;
mod types;

pub use client::*;
pub use page::*;
pub use store::*;
pub use types::*;

use async_trait::async_trait;

use crate::auth::Token;
use crate::models::{ItemError, RemotePageRef};

/// Something pages can be created in.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Create one page.
    ///
    /// `parent` is `None` for a top-level (section) page, or the page created earlier
    /// for the lesson's section.
    async fn create_page(
        &self,
        token: &Token,
        parent: Option<&RemotePageRef>,
        title: &str,
        content: &str,
    ) -> Result<RemotePageRef, ItemError>;
}
