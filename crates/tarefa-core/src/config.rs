//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Config file (`tarefa.toml` in the working directory, or an explicit path)
//! 3. Environment variables (`TAREFA_*`)
//!
//! Each layer overrides the previous. CLI flags are applied by the caller on
//! top of the loaded [`ClientConfig`].
//!
//! # Environment Variables
//!
//! - `TAREFA_API_URL`: base URL of the task API (default `http://localhost:8081`)
//! - `TAREFA_ROLES_CLAIM`: namespaced roles claim key
//! - `TAREFA_ACCESS_TOKEN`: bearer token issued by the identity provider
//! - `TAREFA_LOGIN_URL`: where to send the user when a login is required
//! - `TAREFA_LOGOUT_URL`: provider logout endpoint

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::DEFAULT_ROLES_CLAIM;

/// Default API host used by the development backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tarefa.toml";

/// Resolved client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub roles_claim: String,
    pub access_token: Option<String>,
    pub login_url: Option<String>,
    pub logout_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            roles_claim: DEFAULT_ROLES_CLAIM.to_string(),
            access_token: None,
            login_url: None,
            logout_url: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("roles_claim", &self.roles_claim)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("login_url", &self.login_url)
            .field("logout_url", &self.logout_url)
            .finish()
    }
}

/// On-disk representation; every field is optional so a file can override
/// only what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    roles_claim: Option<String>,
    access_token: Option<String>,
    login_url: Option<String>,
    logout_url: Option<String>,
}

impl ClientConfig {
    fn merge(&mut self, layer: FileConfig) {
        if let Some(v) = layer.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = layer.roles_claim {
            self.roles_claim = v;
        }
        if layer.access_token.is_some() {
            self.access_token = layer.access_token;
        }
        if layer.login_url.is_some() {
            self.login_url = layer.login_url;
        }
        if layer.logout_url.is_some() {
            self.logout_url = layer.logout_url;
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: &'static str, reason: &'static str },
}

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
    Skip,
}

impl EnvSource {
    fn get(&self, var: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(var).ok(),
            EnvSource::Fixed(vars) => vars.get(var).cloned(),
            EnvSource::Skip => None,
        }
    }
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```ignore
/// let config = ConfigLoader::new()
///     .with_file("/etc/tarefa.toml")
///     .load()?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Explicit config file; a missing explicit file is an error.
    file: Option<PathBuf>,
    /// Directory searched for [`DEFAULT_CONFIG_FILE`]; a missing file there is ignored.
    search_dir: Option<PathBuf>,
    env: EnvSource,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            search_dir: None,
            env: EnvSource::Process,
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.env = EnvSource::Skip;
        self
    }

    /// Reads environment variables from the given map instead of the process.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = EnvSource::Fixed(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read or
    /// parsed, or if an environment variable holds an empty value.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::default();

        if let Some(path) = &self.file {
            config.merge(read_file(path)?);
            debug!(path = %path.display(), "Loaded config file");
        } else {
            let dir = self.search_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = dir.join(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                config.merge(read_file(&path)?);
                debug!(path = %path.display(), "Loaded config file");
            }
        }

        let env_layer = FileConfig {
            api_base_url: self.env_non_empty("TAREFA_API_URL")?,
            roles_claim: self.env_non_empty("TAREFA_ROLES_CLAIM")?,
            access_token: self.env_non_empty("TAREFA_ACCESS_TOKEN")?,
            login_url: self.env_non_empty("TAREFA_LOGIN_URL")?,
            logout_url: self.env_non_empty("TAREFA_LOGOUT_URL")?,
        };
        config.merge(env_layer);

        Ok(config)
    }

    fn env_non_empty(&self, var: &'static str) -> Result<Option<String>, ConfigError> {
        match self.env.get(var) {
            Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidEnvVar {
                var,
                reason: "must not be empty",
            }),
            other => Ok(other),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
