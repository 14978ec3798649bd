//! Scenario files
//!
//! A scenario describes the pools deployed on the simulated chain and the
//! ordered list of transfers the protected token forwards to the guard.
//!
//! ```json
//! {
//!   "pools": [
//!     { "address": "0x..a1", "factory": "0x..f2", "token0": "0x..10",
//!       "token1": "0x..20", "version": 2 }
//!   ],
//!   "transfers": [
//!     { "epoch": 10, "from": "0x..01", "to": "0x..02", "amount": "1000" }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use guard::InMemoryChain;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use types::{Address, Epoch, ProtocolVersion, U256};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
    pub transfers: Vec<TransferStep>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolEntry {
    pub address: Address,
    pub factory: Address,
    pub token0: Address,
    pub token1: Address,
    /// Protocol version tag (2 or 3)
    pub version: u8,
    /// Fee tier, required for V3 pools
    #[serde(default)]
    pub fee: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferStep {
    pub epoch: Epoch,
    pub from: Address,
    pub to: Address,
    /// Decimal string, `0x` hex string, or plain number
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: U256,
    #[serde(default)]
    pub special: bool,
    /// Defaults to the protected token
    #[serde(default)]
    pub caller: Option<Address>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {:?}", path))?;
        let scenario: Scenario =
            serde_json::from_str(&data).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        self.pools.iter().try_for_each(|pool| pool.fee_tier().map(|_| ()))
    }

    /// Deploy every pool onto a fresh in-memory chain. Fails on the first
    /// pool `validate` would reject.
    pub fn build_chain(&self) -> Result<InMemoryChain> {
        let mut chain = InMemoryChain::new();
        for pool in &self.pools {
            match pool.fee_tier()? {
                None => chain.deploy_v2_pair(pool.address, pool.factory, pool.token0, pool.token1),
                Some(fee) => {
                    chain.deploy_v3_pool(pool.address, pool.factory, pool.token0, pool.token1, fee)
                }
            }
        }
        Ok(chain)
    }
}

impl PoolEntry {
    /// `None` for a V2 pair, the fee tier for a V3 pool.
    fn fee_tier(&self) -> Result<Option<u32>> {
        match ProtocolVersion::from_tag(self.version) {
            ProtocolVersion::V2 => Ok(None),
            ProtocolVersion::V3 => match self.fee {
                Some(fee) => Ok(Some(fee)),
                None => bail!("V3 pool {:?} has no fee tier", self.address),
            },
            ProtocolVersion::Unsupported(tag) => {
                bail!("pool {:?} has unsupported version {}", self.address, tag)
            }
        }
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(U256::from(n)),
        Raw::Text(s) => parse_amount(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a decimal or `0x`-prefixed hex amount. `"max"` is `U256::MAX`.
pub fn parse_amount(s: &str) -> Result<U256, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("max") {
        return Ok(U256::MAX);
    }
    match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| format!("bad hex amount {s}: {e:?}")),
        None => U256::from_dec_str(s).map_err(|e| format!("bad amount {s}: {e:?}")),
    }
}
