//! Console configuration, loaded from `<config dir>/brokerview/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DOMAIN: &str = "org.apache.activemq.artemis";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Bridge endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Management domain to query.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Seconds between polling refreshes.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:8161/console/jolokia".to_string()
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_poll_interval() -> u64 {
    5
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            endpoint: default_endpoint(),
            domain: default_domain(),
            poll_interval_secs: default_poll_interval(),
            username: None,
            password: None,
        }
    }
}

impl ConsoleConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("brokerview").join("config.toml"))
    }

    /// Load from the config file.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            anyhow::bail!("no config directory on this platform");
        };
        let raw = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from the config file, falling back to defaults when the file
    /// is absent or unreadable.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(%err, "using default console config");
                ConsoleConfig::default()
            }
        }
    }

    /// Search pattern covering every object in the domain.
    pub fn search_pattern(&self) -> String {
        format!("{}:*", self.domain)
    }

    /// Search pattern for top-level broker objects.
    pub fn broker_pattern(&self) -> String {
        format!("{}:broker=*", self.domain)
    }
}
