//! Default values and constants shared by guard services

/// Config file read when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/guard.toml";

/// Directory holding `<environment>.toml` overrides
pub const ENVIRONMENTS_DIR: &str = "config/environments";

/// Environment variable prefix; nested keys are separated by `__`
/// (e.g. `GUARD__ORACLE__QUERY_GAS_LIMIT`)
pub const ENV_PREFIX: &str = "GUARD";
pub const ENV_SEPARATOR: &str = "__";

/// Logging defaults
pub mod logging {
    pub const DEFAULT_LEVEL: &str = "info";
}

/// RPC adapter defaults
pub mod rpc {
    pub const DEFAULT_PRIMARY: &str = "https://polygon-rpc.com";
    pub const DEFAULT_CHAIN_ID: u64 = 137;
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
}
