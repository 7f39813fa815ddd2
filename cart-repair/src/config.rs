//! Sanitizer configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CartError, CartResult};

pub const DEFAULT_STORAGE_KEY: &str = "cart";
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-product.png";

/// Configuration for a sanitize pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Storage key the cart blob lives under
    pub storage_key: String,
    /// Image reference substituted for missing or placeholder images
    pub default_image_url: String,
    /// Compute and report repairs without writing them back
    pub dry_run: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            dry_run: false,
        }
    }
}

impl SanitizerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> CartResult<Self> {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("CART_STORAGE_KEY") {
            config.storage_key = key;
        }

        if let Ok(url) = std::env::var("CART_DEFAULT_IMAGE") {
            config.default_image_url = url;
        }

        if let Ok(raw) = std::env::var("CART_DRY_RUN") {
            config.dry_run = parse_flag(&raw).ok_or_else(|| {
                CartError::Config(format!("CART_DRY_RUN has unrecognized value {raw:?}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file; missing fields take defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> CartResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_default_image(mut self, url: impl Into<String>) -> Self {
        self.default_image_url = url.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reject configurations whose output would itself need repair
    pub fn validate(&self) -> CartResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::Config("storage_key must not be empty".to_string()));
        }

        let image = self.default_image_url.trim();
        if image.is_empty() || image == "null" || image == "undefined" {
            return Err(CartError::Config(format!(
                "default_image_url {:?} is not a usable image reference",
                self.default_image_url
            )));
        }

        Ok(())
    }
}

/// Boolean environment flag: true/false, 1/0, yes/no, on/off (case-insensitive)
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
