//! folio: a small portfolio web server
//!
//! Pages are rendered from a directory of comment-tolerant JSON files that is
//! loaded once at start-up, plus markdown articles read on request.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod media;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentError, ContentIndex, ContentLoader};

/// The site being served
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory of JSON content groups
    pub data_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Directory of markdown articles
    pub articles_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let data_dir = base_dir.join(&config.data_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let articles_dir = base_dir.join(&config.articles_dir);

        Self {
            config,
            base_dir,
            data_dir,
            static_dir,
            articles_dir,
        }
    }

    /// Content loader configured for this site
    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(&self.data_dir).with_extensions(self.config.data_extensions.clone())
    }

    /// Load every content group from the data directory
    pub fn load_content(&self) -> Result<ContentIndex, ContentError> {
        self.loader().load()
    }
}
