//! Options that shape how batches are accepted and how results are rendered.
//!
//! Options come from a TOML file with environment overrides on top:
//!
//! ```toml
//! namespace = "api"
//! base_url = "https://example.com"
//! max_operations_per_request = 25
//! allow_client_generated_ids = false
//! include_relationship_links = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on operations in one request.
pub const DEFAULT_MAX_OPERATIONS: usize = 10;

pub const ENV_NAMESPACE: &str = "JOLT_NAMESPACE";
pub const ENV_BASE_URL: &str = "JOLT_BASE_URL";
pub const ENV_MAX_OPERATIONS: &str = "JOLT_MAX_OPERATIONS";
pub const ENV_ALLOW_CLIENT_IDS: &str = "JOLT_ALLOW_CLIENT_IDS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomicOptions {
    /// Route prefix placed before resource types in links, without slashes.
    pub namespace: Option<String>,
    /// Scheme and host for absolute links. Links are relative when absent.
    pub base_url: Option<String>,
    /// `None` means unlimited.
    pub max_operations_per_request: Option<usize>,
    pub allow_client_generated_ids: bool,
    pub include_relationship_links: bool,
}

impl Default for AtomicOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            base_url: None,
            max_operations_per_request: Some(DEFAULT_MAX_OPERATIONS),
            allow_client_generated_ids: false,
            include_relationship_links: true,
        }
    }
}

impl AtomicOptions {
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load options from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut options = Self::from_toml_str(&contents)?;
        options.apply_env_overrides()?;
        Ok(options)
    }

    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<()> {
        if let Some(value) = lookup(ENV_NAMESPACE) {
            self.namespace = non_empty(value);
        }
        if let Some(value) = lookup(ENV_BASE_URL) {
            self.base_url = non_empty(value);
        }
        if let Some(value) = lookup(ENV_MAX_OPERATIONS) {
            let max: usize = value
                .trim()
                .parse()
                .map_err(|_| invalid_env(ENV_MAX_OPERATIONS, &value))?;
            self.max_operations_per_request = (max > 0).then_some(max);
        }
        if let Some(value) = lookup(ENV_ALLOW_CLIENT_IDS) {
            self.allow_client_generated_ids = match value.trim() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid_env(ENV_ALLOW_CLIENT_IDS, &value)),
            };
        }
        Ok(())
    }

    /// The prefix placed before `/{type}` in links, e.g. `https://host/api`
    /// or `/api`. Empty when neither a base url nor a namespace is set.
    pub fn link_prefix(&self) -> String {
        let mut prefix = self
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default();
        if let Some(namespace) = self.namespace.as_deref() {
            let namespace = namespace.trim_matches('/');
            if !namespace.is_empty() {
                prefix.push('/');
                prefix.push_str(namespace);
            }
        }
        prefix
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn invalid_env(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    }
}
