//! # Guard Configuration
//!
//! Loads [`GuardSettings`] from a TOML file, layered with an optional
//! environment-specific file and `GUARD__`-prefixed environment variables,
//! and seeds a fresh guard's registries from it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use guard_config::{load_settings, GuardSettings};
//!
//! let settings: GuardSettings = load_settings(None, Some("staging"))?;
//! println!("protecting {:?}", settings.guard.protected_token);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod bootstrap;
pub mod defaults;
pub mod settings;

pub use bootstrap::bootstrap_registries;
pub use settings::{
    load_settings, FactoryEntry, GuardSection, GuardSettings, LoggingSettings, RpcSettings,
};
