//! Configuration for the LaptopHub client
//!
//! Values are layered: built-in defaults, then an optional config file,
//! then `LAPTOPHUB_*` environment variables, then builder overrides.
//! Nested keys use a double underscore, e.g.
//! `LAPTOPHUB_TOKEN_STORAGE__STORAGE_PATH`.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LaptopHubError, Result};
use crate::normalize::MessagePolicyKind;

pub const DEFAULT_BASE_URL: &str = "https://laptophub.autoqueue.systems/api";

/// Server-side page size for every paginated collection
pub const DEFAULT_PAGE_SIZE: u32 = 12;

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("laptophub")
}

pub fn default_storage_path() -> PathBuf {
    default_storage_dir().join("session.json")
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("laptophub")
        .join("config.toml")
}

/// Where the session keys are persisted
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenStorageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl Default for TokenStorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_path: None,
        }
    }
}

impl TokenStorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(default_storage_path)
    }
}

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Request timeout in seconds; `None` leaves the transport default
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub token_storage: TokenStorageConfig,
    #[serde(default)]
    pub error_messages: MessagePolicyKind,
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            page_size: DEFAULT_PAGE_SIZE,
            token_storage: TokenStorageConfig::default(),
            error_messages: MessagePolicyKind::default(),
        }
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    page_size: Option<u32>,
    token_storage: Option<TokenStorageConfig>,
    error_messages: Option<MessagePolicyKind>,
    config_file: Option<PathBuf>,
    skip_environment: bool,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn token_storage(mut self, token_storage: TokenStorageConfig) -> Self {
        self.token_storage = Some(token_storage);
        self
    }

    pub fn error_messages(mut self, policy: MessagePolicyKind) -> Self {
        self.error_messages = Some(policy);
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Ignore `LAPTOPHUB_*` variables.
    pub fn without_environment(mut self) -> Self {
        self.skip_environment = true;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let mut config =
            ClientConfig::layered(self.config_file.as_deref(), !self.skip_environment)?;

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Some(timeout);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(token_storage) = self.token_storage {
            config.token_storage = token_storage;
        }
        if let Some(policy) = self.error_messages {
            config.error_messages = policy;
        }

        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    pub fn new() -> Result<Self> {
        Self::from_file_and_env::<&str>(None)
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn from_file_and_env<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let config = Self::layered(config_file.as_ref().map(|p| p.as_ref()), true)?;
        config.validate()?;
        Ok(config)
    }

    fn layered(config_file: Option<&Path>, with_env: bool) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("page_size", i64::from(DEFAULT_PAGE_SIZE))?
            .set_default("error_messages", "first")?;

        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("LAPTOPHUB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(LaptopHubError::config("Base URL cannot be empty"));
        }
        if self.page_size == 0 {
            return Err(LaptopHubError::config("Page size must be at least 1"));
        }
        Ok(())
    }

    /// Join the base URL and an endpoint path with exactly one slash.
    ///
    /// The endpoint's own trailing slash and query string are preserved;
    /// the backend distinguishes `/laptops/` from `/laptops`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        let base_url =
            if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
                self.base_url.clone()
            } else {
                format!("https://{}", self.base_url)
            };

        format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
    }
}
