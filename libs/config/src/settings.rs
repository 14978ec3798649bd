//! Guard Settings
//!
//! Provides configuration loading for the guard and its tooling. Supports
//! loading from TOML files with environment-specific overrides.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use guard::OracleSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use types::Address;

use crate::defaults;

/// Main guard configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GuardSettings {
    /// Identities fixed at construction
    pub guard: GuardSection,

    /// Pair oracle query budget
    #[serde(default)]
    pub oracle: OracleSettings,

    /// Accounts exempt from the directional limit at startup
    #[serde(default)]
    pub exemptions: Vec<Address>,

    /// Factories registered at startup
    #[serde(default)]
    pub factories: Vec<FactoryEntry>,

    /// Node endpoints for live pool probing
    #[serde(default)]
    pub rpc: RpcSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GuardSection {
    /// The only caller allowed to invoke the transfer hook
    pub protected_token: Address,

    /// Administrative identity
    pub owner: Address,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FactoryEntry {
    pub address: Address,

    /// Protocol version tag (2 or 3)
    pub version: u8,

    #[serde(default = "default_true")]
    pub whitelisted: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RpcSettings {
    /// Primary RPC endpoint
    pub primary_rpc: String,

    /// Fallback RPC endpoints
    pub fallback_rpcs: Vec<String>,

    pub chain_id: u64,

    /// Per-request timeout in milliseconds
    pub rpc_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            primary_rpc: defaults::rpc::DEFAULT_PRIMARY.to_string(),
            fallback_rpcs: Vec::new(),
            chain_id: defaults::rpc::DEFAULT_CHAIN_ID,
            rpc_timeout_ms: defaults::rpc::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::logging::DEFAULT_LEVEL.to_string(),
            json: false,
        }
    }
}

impl GuardSettings {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(defaults::DEFAULT_CONFIG_PATH));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .map(|dir| dir.join("environments"))
                .unwrap_or_else(|| PathBuf::from(defaults::ENVIRONMENTS_DIR))
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (GUARD__ prefix)
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator(defaults::ENV_SEPARATOR)
                .separator(defaults::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Expand environment variables in RPC URLs (API keys are usually kept
    /// out of the file)
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let expanded = shellexpand::env(&self.rpc.primary_rpc).context("Failed to expand RPC URL")?;
        self.rpc.primary_rpc = expanded.to_string();

        for url in &mut self.rpc.fallback_rpcs {
            let expanded = shellexpand::env(url).context("Failed to expand fallback RPC URL")?;
            *url = expanded.to_string();
        }
        Ok(())
    }
}

/// Convenience function to load configuration with env expansion applied
pub fn load_settings(base_path: Option<&Path>, environment: Option<&str>) -> Result<GuardSettings> {
    let mut settings = GuardSettings::load(base_path, environment)?;
    settings.expand_env_vars()?;
    Ok(settings)
}
