//! Notification settings loaded from a TOML file

use serde::Deserialize;
use std::path::Path;

use crate::error::{NotifyError, Result};
use crate::event::Repository;

/// Per-repository notification settings as seen by the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySettings {
    pub enabled: bool,
    pub local_webhook_url: Option<String>,
    pub channel_override: Option<String>,
}

/// Read-only source of notification settings
pub trait ConfigProvider: Send + Sync {
    /// Settings for one repository. Unknown repositories are disabled.
    fn repository_settings(&self, repository: &Repository) -> RepositorySettings;

    /// Instance-wide default webhook URL
    fn global_webhook_url(&self) -> Option<String>;
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotifyConfig {
    /// Root of the repository browser, used to build commit links
    pub base_url: String,
    /// Global webhook URL
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub repository: Vec<RepositoryConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RepositoryConfig {
    pub project: String,
    pub slug: String,
    #[serde(default)]
    pub enabled: bool,
    pub webhook_url: Option<String>,
    pub channel: Option<String>,
}

impl NotifyConfig {
    /// Finds the entry matching both project key and slug.
    pub fn find_repository(&self, project: &str, slug: &str) -> Option<&RepositoryConfig> {
        self.repository
            .iter()
            .find(|repo| repo.project == project && repo.slug == slug)
    }
}

impl ConfigProvider for NotifyConfig {
    fn repository_settings(&self, repository: &Repository) -> RepositorySettings {
        self.find_repository(&repository.project_key, &repository.slug)
            .map(|repo| RepositorySettings {
                enabled: repo.enabled,
                local_webhook_url: repo.webhook_url.clone(),
                channel_override: repo.channel.clone(),
            })
            .unwrap_or_default()
    }

    fn global_webhook_url(&self) -> Option<String> {
        self.webhook_url.clone()
    }
}

/// Load and parse the configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<NotifyConfig> {
    let path = path.as_ref();
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        NotifyError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&config_str).map_err(|e| {
        NotifyError::ConfigError(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}
