//! Command-line arguments and config resolution

use anyhow::Context;
use cart_repair::{CartSanitizer, FileStore, SanitizeReport, SanitizerConfig};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Repair the shopping cart held in a local-storage dump
#[derive(Parser, Debug)]
#[command(name = "cart-repair")]
#[command(about = "Replace broken image references and invalid quantities in a stored cart")]
pub struct Args {
    /// Local-storage dump file (JSON object of key -> string value)
    #[arg(long, env = "CART_STORE_PATH")]
    pub store: PathBuf,

    /// Storage key holding the cart (overrides config and CART_STORAGE_KEY)
    #[arg(long)]
    pub key: Option<String>,

    /// Image reference used for missing or placeholder images
    #[arg(long)]
    pub default_image: Option<String>,

    /// YAML configuration file; environment variables are used when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report repairs without writing them back
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Merge file or environment configuration with command-line overrides
    pub fn resolve_config(&self) -> anyhow::Result<SanitizerConfig> {
        let mut config = match &self.config {
            Some(path) => SanitizerConfig::from_yaml_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SanitizerConfig::from_env().context("invalid cart configuration in environment")?,
        };

        if let Some(key) = &self.key {
            config.storage_key.clone_from(key);
        }
        if let Some(image) = &self.default_image {
            config.default_image_url.clone_from(image);
        }
        config.dry_run |= self.dry_run;

        config.validate().context("invalid cart configuration")?;
        Ok(config)
    }

    /// Run one pass over the configured store
    pub fn run(&self) -> anyhow::Result<SanitizeReport> {
        let config = self.resolve_config()?;
        info!(
            store = %self.store.display(),
            key = %config.storage_key,
            dry_run = config.dry_run,
            "cart repair configured"
        );

        let sanitizer = CartSanitizer::new(FileStore::new(&self.store), config)?;
        Ok(sanitizer.sanitize())
    }
}

/// Process exit status for a finished pass
pub fn exit_code(report: &SanitizeReport) -> ExitCode {
    if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
