// src/config.rs
// =============================================================================
// Pipeline configuration.
//
// Everything platform-specific lives here: which hosts are legacy, where
// they move to, which assets are never shown, what the placeholder tile is,
// and in which order the link categories are listed.
//
// The defaults match the production platform. A TOML file can override any
// field:
//
//   canonical_host = "cdn.example.org"
//   legacy_hosts = ["ipfs.skatehive.app", "old-cdn.example.org"]
//   category_order = ["iframe", "image", "custom-embed", "youtube"]
//   fallback_policy = "before-exclusion"
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collector::CategoryOrder;
use crate::transform::HostRewrite;

pub const DEFAULT_LEGACY_HOST: &str = "ipfs.skatehive.app";
pub const DEFAULT_CANONICAL_HOST: &str = "gateway.pinata.cloud";

const DISCORD_BANNER: &str = "https://ipfs.skatehive.app/ipfs/QmdTJSEE1286z1JqxKh8LtsuDjuKB1yRSBZy2AwEogzjVW?pinataGatewayToken=nxHSFa1jQsiF7IHeXWH-gXCY3LDLlZ7Run3aZXZc8DRCfQz4J4a94z9DmVftXyFE";
const PLATFORM_LOGO: &str = "https://www.skatehive.app/assets/skatehive.jpeg";
const PLACEHOLDER_TILE: &str = "https://ipfs.skatehive.app/ipfs/QmWgkeX38hgWNh7cj2mTvk8ckgGK3HSB5VeNn2yn9BEnt7?pinataGatewayToken=nxHSFa1jQsiF7IHeXWH-gXCY3LDLlZ7Run3aZXZc8DRCfQz4J4a94z9DmVftXyFE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("canonical_host must not be empty")]
    EmptyCanonicalHost,

    #[error("canonical host '{canonical}' contains legacy host '{legacy}'")]
    CanonicalContainsLegacy { canonical: String, legacy: String },

    #[error("fallback_url must not be empty")]
    EmptyFallbackUrl,

    #[error("Invalid category order: {0}")]
    CategoryOrder(String),
}

// When the placeholder tile is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Add the placeholder whenever the final media list is empty
    #[default]
    AfterExclusion,
    /// Add the placeholder only if no video link was found at all, even one
    /// that was later excluded
    BeforeExclusion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub canonical_host: String,
    pub legacy_hosts: Vec<String>,
    pub excluded_urls: Vec<String>,
    pub fallback_url: String,
    pub animated_extension: String,
    pub category_order: CategoryOrder,
    pub fallback_policy: FallbackPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical_host: DEFAULT_CANONICAL_HOST.to_string(),
            legacy_hosts: vec![DEFAULT_LEGACY_HOST.to_string()],
            excluded_urls: vec![DISCORD_BANNER.to_string(), PLATFORM_LOGO.to_string()],
            fallback_url: PLACEHOLDER_TILE.to_string(),
            animated_extension: ".gif".to_string(),
            category_order: CategoryOrder::default(),
            fallback_policy: FallbackPolicy::default(),
        }
    }
}

impl PipelineConfig {
    // Reads, parses and validates a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canonical_host.trim().is_empty() {
            return Err(ConfigError::EmptyCanonicalHost);
        }

        // A canonical host that contains a legacy one would be rewritten
        // again on the next pass
        if let Some(legacy) = self
            .legacy_hosts
            .iter()
            .find(|legacy| !legacy.is_empty() && self.canonical_host.contains(legacy.as_str()))
        {
            return Err(ConfigError::CanonicalContainsLegacy {
                canonical: self.canonical_host.clone(),
                legacy: legacy.clone(),
            });
        }

        if self.fallback_url.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackUrl);
        }

        if self.legacy_hosts.iter().any(String::is_empty) {
            tracing::warn!("ignoring empty entry in legacy_hosts");
        }

        Ok(())
    }

    pub fn host_rewrite(&self) -> HostRewrite {
        HostRewrite::new(self.legacy_hosts.clone(), self.canonical_host.clone())
    }
}
