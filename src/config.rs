use crate::client::SolrConfig;
use crate::query::{NamedQueries, FIND_BY_NAMED_QUERY, FREE_TEXT_TEMPLATE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solr: SolrSection,
    /// Named query templates, keyed by symbolic name
    #[serde(default = "default_queries")]
    pub queries: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolrSection {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_core")]
    pub core: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_within_ms: Option<u64>,
}

fn default_url() -> String {
    crate::client::DEFAULT_SOLR_URL.to_string()
}

fn default_core() -> String {
    crate::client::DEFAULT_CORE.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::client::solr::DEFAULT_TIMEOUT.as_secs()
}

fn default_queries() -> BTreeMap<String, String> {
    let mut queries = BTreeMap::new();
    queries.insert(
        FIND_BY_NAMED_QUERY.to_string(),
        FREE_TEXT_TEMPLATE.to_string(),
    );
    queries
}

impl Default for SolrSection {
    fn default() -> Self {
        SolrSection {
            url: default_url(),
            core: default_core(),
            timeout_secs: default_timeout_secs(),
            commit_within_ms: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating a default one if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Config::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".solrbuddy").join("config.toml"))
    }

    /// Connection settings for the Solr client
    pub fn solr_config(&self) -> SolrConfig {
        SolrConfig {
            base_url: self.solr.url.clone(),
            core: self.solr.core.clone(),
            timeout: Duration::from_secs(self.solr.timeout_secs),
            commit_within_ms: self.solr.commit_within_ms,
        }
    }

    /// Parse the configured templates into a named query table
    pub fn named_queries(&self) -> Result<NamedQueries> {
        NamedQueries::from_map(&self.queries).context("Invalid named query in config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            solr: SolrSection::default(),
            queries: default_queries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.solr.url, "http://localhost:8983/solr");
        assert_eq!(config.solr.core, "product");
        assert!(config.queries.contains_key(FIND_BY_NAMED_QUERY));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [solr]
            core = "catalog"
            "#,
        )
        .unwrap();
        assert_eq!(config.solr.core, "catalog");
        assert_eq!(config.solr.timeout_secs, 30);
        assert_eq!(config.solr_config().timeout, Duration::from_secs(30));
        assert!(config.named_queries().unwrap().contains(FIND_BY_NAMED_QUERY));
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.solr.core, "product");
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.solr.commit_within_ms = Some(1000);
        config
            .queries
            .insert("Product.byCategory".to_string(), "category:?0".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.solr.commit_within_ms, Some(1000));
        assert_eq!(loaded.named_queries().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut config = Config::default();
        config
            .queries
            .insert("Product.broken".to_string(), "price:*?0*".to_string());
        assert!(config.named_queries().is_err());
    }
}
