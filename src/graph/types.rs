//! Wire types for the OneNote endpoints of Microsoft Graph.

use serde::{Deserialize, Serialize};

/// Graph collection envelope: `{ "value": [...] }`.
#[derive(Debug, Deserialize)]
pub struct GraphList<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub display_name: String,
}

/// Response to a page creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    #[serde(default)]
    pub one_note_web_url: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

impl CreatedPage {
    /// A page known only by the URL OneNote returned in `Location`.
    /// The id is empty when there is no such header.
    pub fn from_location(location: Option<&str>) -> Self {
        let id = location
            .map(|l| l.trim_end_matches('/'))
            .and_then(|l| l.rsplit('/').next())
            .unwrap_or_default()
            .to_string();
        Self {
            id,
            title: None,
            links: None,
        }
    }

    pub fn web_url(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.one_note_web_url.as_ref())
            .map(|l| l.href.as_str())
    }
}
