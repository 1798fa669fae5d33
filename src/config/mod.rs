use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::feed::DEFAULT_FEED_URL;

/// Who this run of the app presents itself as. The Admin view and the
/// extra nav entry key off this; it lives in the config file and is
/// passed around explicitly, never read from a shared cache.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub superuser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Blog feed URL (a JSON array of posts)
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Users API base, e.g. "https://dashboard.example.com/api/v1".
    /// The admin view stays disabled while this is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Show desktop notifications for form submissions
    #[serde(default = "default_true")]
    pub notifications: bool,

    /// Page size for the admin users list
    #[serde(default = "default_users_page_size")]
    pub users_page_size: usize,

    /// Session identity for gated views
    #[serde(default)]
    pub session: Session,

    /// Theme color overrides, e.g. accent = "#89b4fa"
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub theme: HashMap<String, String>,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_users_page_size() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            api_base: None,
            notifications: true,
            users_page_size: default_users_page_size(),
            session: Session::default(),
            theme: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("postern");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Normalize before writing so hand edits don't accumulate junk.
        let mut clean = self.clone();
        if clean.feed_url.trim().is_empty() {
            clean.feed_url = default_feed_url();
        }
        if let Some(base) = clean.api_base.take() {
            let trimmed = base.trim().trim_end_matches('/').to_string();
            if !trimmed.is_empty() {
                clean.api_base = Some(trimmed);
            }
        }
        if clean.session.email.as_deref() == Some("") {
            clean.session.email = None;
        }

        let content = toml::to_string_pretty(&clean)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            feed_url: "https://example.com/posts.json".to_string(),
            api_base: Some("https://dashboard.example.com/api/v1".to_string()),
            notifications: false,
            users_page_size: 25,
            session: Session {
                email: Some("ops@example.com".to_string()),
                superuser: true,
            },
            theme: HashMap::from([("accent".to_string(), "#89b4fa".to_string())]),
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.feed_url, deserialized.feed_url);
        assert_eq!(config.api_base, deserialized.api_base);
        assert_eq!(config.session, deserialized.session);
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.users_page_size, deserialized.users_page_size);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert!(config.api_base.is_none());
        assert!(config.notifications);
        assert_eq!(config.users_page_size, 50);
        assert!(!config.session.superuser);
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let config: AppConfig = toml::from_str("future_flag = true\n").unwrap();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
    }
}
