//! Importer configuration.
//!
//! Values come from defaults, then `onenote-import/config.json` in the user config
//! directory, then environment variables:
//! - `CLIENT_ID` - Azure app registration id (required for remote commands)
//! - `TENANT_ID` - Directory tenant for organizational accounts (default: `common`)
//! - `ACCOUNT_TYPE` - `personal` or `organizational` (default: `personal`)
//! - `DEFAULT_NOTEBOOK` / `DEFAULT_SECTION` - Import destination
//! - `ONENOTE_GRAPH_URL` - Graph API root (default: `https://graph.microsoft.com/v1.0`)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::DEFAULT_GRAPH_URL;
use crate::naming::NamingStrategy;
use crate::outline::OUTLINE_SUFFIX;

const APP_NAME: &str = "onenote-import";
const CONFIG_FILE: &str = "config.json";
const LOGIN_URL: &str = "https://login.microsoftonline.com";

/// Which kind of Microsoft account signs in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Personal,
    Organizational,
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "organizational" | "organization" | "work" => Ok(Self::Organizational),
            other => Err(format!(
                "Invalid account type '{}'. Must be: personal or organizational",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub client_id: Option<String>,
    pub tenant_id: String,
    pub account_type: AccountType,
    pub graph_url: String,
    pub default_notebook: Option<String>,
    pub default_section: Option<String>,
    pub naming: NamingStrategy,
    /// Filename suffix used to discover outline files.
    pub outline_suffix: String,
    /// Milliseconds to wait between page creations.
    pub pace_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            tenant_id: "common".to_string(),
            account_type: AccountType::Personal,
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            default_notebook: None,
            default_section: None,
            naming: NamingStrategy::Numbered,
            outline_suffix: OUTLINE_SUFFIX.to_string(),
            pace_ms: 0,
        }
    }
}

impl Config {
    /// Load from the config file and environment.
    /// A missing or broken config file falls back to defaults.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|p| Self::from_file(&p)) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read a config file. A file that does not exist yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("CLIENT_ID") {
            self.client_id = Some(v);
        }
        if let Some(v) = non_empty("TENANT_ID") {
            self.tenant_id = v;
        }
        if let Some(v) = non_empty("ACCOUNT_TYPE") {
            match v.parse() {
                Ok(t) => self.account_type = t,
                Err(e) => warn!("Ignoring ACCOUNT_TYPE: {}", e),
            }
        }
        if let Some(v) = non_empty("DEFAULT_NOTEBOOK") {
            self.default_notebook = Some(v);
        }
        if let Some(v) = non_empty("DEFAULT_SECTION") {
            self.default_section = Some(v);
        }
        if let Some(v) = non_empty("ONENOTE_GRAPH_URL") {
            self.graph_url = v;
        }
    }

    /// The app registration id, required before talking to Microsoft.
    pub fn require_client_id(&self) -> Result<&str> {
        self.client_id.as_deref().ok_or_else(|| {
            anyhow::anyhow!("Missing CLIENT_ID. Set it in the environment or config file.")
        })
    }

    pub fn authority(&self) -> String {
        match self.account_type {
            AccountType::Personal => format!("{}/common", LOGIN_URL),
            AccountType::Organizational => format!("{}/{}", LOGIN_URL, self.tenant_id),
        }
    }

    pub fn scopes(&self) -> Vec<String> {
        let scopes: &[&str] = match self.account_type {
            AccountType::Personal => &[
                "https://graph.microsoft.com/Notes.ReadWrite",
                "https://graph.microsoft.com/Notes.Read",
                "offline_access",
            ],
            AccountType::Organizational => {
                &["https://graph.microsoft.com/.default", "offline_access"]
            }
        };
        scopes.iter().map(|s| s.to_string()).collect()
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
