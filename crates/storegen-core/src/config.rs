//! Application configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! | variable                 | setting                  |
//! |--------------------------|--------------------------|
//! | `V0_API_KEY`             | `generation.api_key`     |
//! | `V0_API_URL`             | `generation.api_url`     |
//! | `V_TOKEN`/`VERCEL_TOKEN` | `hosting.token`          |
//! | `V_TEAM_ID`              | `hosting.team_id`        |
//! | `STOREGEN_BIND`          | `server.bind`            |
//! | `STOREGEN_TEMPLATE_ID`   | `generation.template_id` |
//! | `STOREGEN_SKELETON_DIR`  | `skeleton_dir`           |
//!
//! Credentials are redacted in `Debug` output and never serialized.

use crate::error::ConfigError;
use crate::types::{ModelOptions, Privacy};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storegen_files::Skeleton;

/// Default generation API base
pub const DEFAULT_GENERATION_URL: &str = "https://api.v0.dev/v1";

/// Default hosting API base
pub const DEFAULT_HOSTING_URL: &str = "https://api.vercel.com";

/// Credential that never leaks through `Debug`
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Credential value, for request headers only
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

/// HTTP surface settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Generation service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API base URL
    pub api_url: String,
    /// API key
    #[serde(skip_serializing)]
    pub api_key: Option<Secret>,
    /// Template conversation to fork from
    pub template_id: Option<String>,
    /// Model configuration for new conversations
    pub model: ModelOptions,
    /// Visibility of new conversations
    pub privacy: Privacy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GENERATION_URL.to_string(),
            api_key: None,
            template_id: None,
            model: ModelOptions::default(),
            privacy: Privacy::default(),
        }
    }
}

/// Hosting service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    /// API base URL
    pub api_url: String,
    /// API token
    #[serde(skip_serializing)]
    pub token: Option<Secret>,
    /// Team the deployments belong to
    pub team_id: Option<String>,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_HOSTING_URL.to_string(),
            token: None,
            team_id: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP surface
    pub server: ServerConfig,
    /// Generation service
    pub generation: GenerationConfig,
    /// Hosting service
    pub hosting: HostingConfig,
    /// Skeleton directory, embedded skeleton when unset
    pub skeleton_dir: Option<PathBuf>,
    /// Per-request timeout for external calls
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            generation: GenerationConfig::default(),
            hosting: HostingConfig::default(),
            skeleton_dir: None,
            request_timeout_secs: 120,
        }
    }
}

impl AppConfig {
    /// Parse TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` for invalid TOML or unknown value types
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// `ConfigError::Read` or `ConfigError::Parse`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// File (if any) plus process environment
    ///
    /// # Errors
    /// File errors and invalid environment values
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` for an unparseable `STOREGEN_BIND`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("V0_API_KEY") {
            self.generation.api_key = Some(Secret::new(key));
        }
        if let Some(url) = get("V0_API_URL") {
            self.generation.api_url = url;
        }
        if let Some(token) = get("V_TOKEN").or_else(|| get("VERCEL_TOKEN")) {
            self.hosting.token = Some(Secret::new(token));
        }
        if let Some(team) = get("V_TEAM_ID") {
            self.hosting.team_id = Some(team);
        }
        if let Some(bind) = get("STOREGEN_BIND") {
            self.server.bind = bind.parse().map_err(|_| ConfigError::InvalidValue {
                key: "STOREGEN_BIND",
                value: bind.clone(),
            })?;
        }
        if let Some(template) = get("STOREGEN_TEMPLATE_ID") {
            self.generation.template_id = Some(template);
        }
        if let Some(dir) = get("STOREGEN_SKELETON_DIR") {
            self.skeleton_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Timeout for external calls
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured or embedded skeleton
    ///
    /// # Errors
    /// `ConfigError::Skeleton` for a missing or incomplete directory
    pub fn skeleton(&self) -> Result<Skeleton, ConfigError> {
        Ok(Skeleton::load(self.skeleton_dir.as_deref())?)
    }
}
