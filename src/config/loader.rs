//! Configuration structures and loading logic.

use crate::config::collision::CollisionPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Account credentials configuration.
///
/// Both fields count as explicitly supplied credentials and win over
/// `SYNAPSE_USERNAME` / `SYNAPSE_PASSWORD`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

/// Synapse service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the repository service.
    #[serde(default = "default_repo_endpoint")]
    pub repo_endpoint: String,

    /// Base URL of the authentication service.
    #[serde(default = "default_auth_endpoint")]
    pub auth_endpoint: String,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds. Unset means requests never time out.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Synapse ID of the project or folder to mirror.
    #[serde(default)]
    pub entity_id: Option<String>,

    /// Local directory the tree is mirrored into.
    #[serde(default)]
    pub download_directory: Option<String>,

    /// What to do when a file already exists locally.
    #[serde(default)]
    pub if_collision: CollisionPolicy,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            entity_id: None,
            download_directory: None,
            if_collision: CollisionPolicy::default(),
            show_downloads: true,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            repo_endpoint: default_repo_endpoint(),
            auth_endpoint: default_auth_endpoint(),
            user_agent: default_user_agent(),
            timeout_seconds: None,
        }
    }
}

impl ServiceConfig {
    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn default_repo_endpoint() -> String {
    "https://repo-prod.prod.sagebase.org/repo/v1".to_string()
}

fn default_auth_endpoint() -> String {
    "https://repo-prod.prod.sagebase.org/auth/v1".to_string()
}

fn default_user_agent() -> String {
    format!("synapse-downloader/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the configured download directory, unexpanded.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
