//! Top-level application configuration.
//!
//! Configuration is stored in `<shop home>/config.yaml` and includes:
//! - The REST API base URL and request timeout
//! - Catalog paging, breakpoint, and debounce settings
//! - The payment return URL handed to the gateway
//! - Avatar cropper output size

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopError};
use crate::paths;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub cropper: CropperConfig,
}

/// REST API connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Catalog browsing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Terminal width (columns) below which the browser switches to infinite scroll
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u16,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Number of products in each sidebar list
    #[serde(default = "default_sidebar_limit")]
    pub sidebar_limit: u32,
}

fn default_page_size() -> u32 {
    12
}

fn default_mobile_breakpoint() -> u16 {
    100
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_sidebar_limit() -> u32 {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            mobile_breakpoint: default_mobile_breakpoint(),
            search_debounce_ms: default_search_debounce_ms(),
            sidebar_limit: default_sidebar_limit(),
        }
    }
}

/// Payment flow settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfig {
    /// URL the gateway redirects back to once the customer finishes paying
    #[serde(default = "default_return_url")]
    pub return_url: String,
}

fn default_return_url() -> String {
    "shopfront://payment-return".to_string()
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            return_url: default_return_url(),
        }
    }
}

/// Avatar cropper settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropperConfig {
    #[serde(default = "default_output_size")]
    pub output_size: u32,
}

fn default_output_size() -> u32 {
    256
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            output_size: default_output_size(),
        }
    }
}

/// Keys accepted by `config get` / `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout_secs",
    "catalog.page_size",
    "catalog.mobile_breakpoint",
    "catalog.search_debounce_ms",
    "catalog.sidebar_limit",
    "payment.return_url",
    "cropper.output_size",
];

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        paths::config_path()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            ShopError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ShopError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            ShopError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        Ok(())
    }

    /// Reject values the rest of the client cannot work with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| ShopError::Config(format!("api.base_url '{}': {e}", self.api.base_url)))?;
        if self.catalog.page_size == 0 {
            return Err(ShopError::Config(
                "catalog.page_size must be at least 1".to_string(),
            ));
        }
        if self.cropper.output_size == 0 {
            return Err(ShopError::Config(
                "cropper.output_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// API base URL from environment variable or config file
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = env::var("SHOPFRONT_API_URL")
            && !url.is_empty()
        {
            return url;
        }

        self.api.base_url.clone()
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.catalog.search_debounce_ms)
    }

    /// Read a single value by dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout_secs" => self.api.timeout_secs.to_string(),
            "catalog.page_size" => self.catalog.page_size.to_string(),
            "catalog.mobile_breakpoint" => self.catalog.mobile_breakpoint.to_string(),
            "catalog.search_debounce_ms" => self.catalog.search_debounce_ms.to_string(),
            "catalog.sidebar_limit" => self.catalog.sidebar_limit.to_string(),
            "payment.return_url" => self.payment.return_url.clone(),
            "cropper.output_size" => self.cropper.output_size.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Update a single value by dotted key, validating the result
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => self.api.base_url = value.to_string(),
            "api.timeout_secs" => self.api.timeout_secs = parse_number(key, value)?,
            "catalog.page_size" => self.catalog.page_size = parse_number(key, value)?,
            "catalog.mobile_breakpoint" => {
                self.catalog.mobile_breakpoint = parse_number(key, value)?
            }
            "catalog.search_debounce_ms" => {
                self.catalog.search_debounce_ms = parse_number(key, value)?
            }
            "catalog.sidebar_limit" => self.catalog.sidebar_limit = parse_number(key, value)?,
            "payment.return_url" => self.payment.return_url = value.to_string(),
            "cropper.output_size" => self.cropper.output_size = parse_number(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        self.validate()
    }
}

fn unknown_key(key: &str) -> ShopError {
    ShopError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ShopError::Config(format!("'{value}' is not a valid number for {key}")))
}
