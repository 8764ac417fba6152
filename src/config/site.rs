//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub language: String,
    /// IANA timezone used for log timestamps
    pub timezone: String,

    // Directories, relative to the base directory
    pub data_dir: String,
    pub static_dir: String,
    pub articles_dir: String,

    // Content
    /// File suffixes picked up from `data_dir`
    pub data_extensions: Vec<String>,
    pub portfolio_group: String,
    pub blog_group: String,
    pub project_group: String,

    // Media
    pub image_timeout_secs: u64,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            url: "http://localhost:8000".to_string(),
            language: "en".to_string(),
            timezone: "Asia/Dhaka".to_string(),

            data_dir: "static/utils".to_string(),
            static_dir: "static".to_string(),
            articles_dir: "static/articles".to_string(),

            data_extensions: vec!["json".to_string()],
            portfolio_group: "merge_data".to_string(),
            blog_group: "blogs".to_string(),
            project_group: "projects".to_string(),

            image_timeout_secs: 10,
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.data_dir, "static/utils");
        assert_eq!(config.portfolio_group, "merge_data");
        assert_eq!(config.data_extensions, vec!["json"]);
        assert_eq!(config.timezone, "Asia/Dhaka");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Principal AI Engineer
description: Production AI Systems
data_dir: content
data_extensions: [json, jsonc]
image_timeout_secs: 3
github: someone
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Principal AI Engineer");
        assert_eq!(config.data_dir, "content");
        assert_eq!(config.data_extensions, vec!["json", "jsonc"]);
        assert_eq!(config.image_timeout(), Duration::from_secs(3));
        assert_eq!(config.blog_group, "blogs");
        assert!(config.extra.contains_key("github"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = SiteConfig::load(dir.path().join("_config.yml")).unwrap_err();
        assert!(err.to_string().contains("_config.yml"));
    }
}
