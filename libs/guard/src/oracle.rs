//! Pair validation oracle
//!
//! Decides whether an address is a genuine liquidity pool of a whitelisted
//! factory. A candidate's own answers are never trusted on their own: the
//! factory it names must be whitelisted, and that factory must return the
//! candidate as the canonical pool for the candidate's token pair (and fee
//! tier, for V3).
//!
//! Fails closed. Every failed, reverted, over-budget or undecodable query
//! means "not a pool", so a misbehaving contract is simply treated as an
//! ordinary account and stays subject to the directional limit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use dex::abi::{uniswap_v2, uniswap_v3};
use dex::{decode_address, decode_fee_tier, AbiError};
use ethabi::Function;
use types::{Address, ProtocolVersion};

use crate::host::{CallError, ChainReader};
use crate::registry::FactoryRegistry;

/// Gas budget per oracle query unless configured otherwise.
pub const DEFAULT_QUERY_GAS_LIMIT: u64 = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Gas budget for each read-only query made against a candidate or its
    /// factory.
    pub query_gas_limit: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            query_gas_limit: DEFAULT_QUERY_GAS_LIMIT,
        }
    }
}

/// A confirmed pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolMatch {
    pub pool: Address,
    pub factory: Address,
    pub version: ProtocolVersion,
    pub token0: Address,
    pub token1: Address,
    /// Fee tier, V3 only.
    pub fee: Option<u32>,
}

/// Why a candidate was not recognized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoolRejection {
    #[error("no code at candidate")]
    NoCode,

    #[error("code lookup failed: {0}")]
    CodeLookup(CallError),

    #[error("{function} query failed: {source}")]
    QueryFailed {
        function: &'static str,
        source: CallError,
    },

    #[error("{0}")]
    Abi(String),

    #[error("factory {0:?} is not whitelisted")]
    FactoryNotWhitelisted(Address),

    #[error("factory registered with unsupported version tag {0}")]
    UnsupportedVersion(u8),

    #[error("factory resolves the pair to {canonical:?}")]
    NotCanonical { canonical: Address },
}

impl From<AbiError> for PoolRejection {
    fn from(e: AbiError) -> Self {
        PoolRejection::Abi(e.to_string())
    }
}

/// The oracle itself: a host reader plus the query budget. The factory
/// registry is passed in on every call since it belongs to the guard's
/// administrative surface.
#[derive(Debug)]
pub struct PairOracle<R> {
    reader: R,
    settings: OracleSettings,
}

impl<R: ChainReader> PairOracle<R> {
    pub fn new(reader: R, settings: OracleSettings) -> Self {
        Self { reader, settings }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn settings(&self) -> OracleSettings {
        self.settings
    }

    /// `true` iff `candidate` is confirmed as a pool. Never fails.
    pub fn is_recognized_pool(&self, candidate: Address, factories: &FactoryRegistry) -> bool {
        match self.validate(candidate, factories) {
            Ok(matched) => {
                debug!(
                    candidate = ?candidate,
                    factory = ?matched.factory,
                    version = %matched.version,
                    "recognized pool"
                );
                true
            }
            Err(reason) => {
                debug!(candidate = ?candidate, %reason, "not a recognized pool");
                false
            }
        }
    }

    /// Full validation with the reason for a negative answer.
    pub fn validate(
        &self,
        candidate: Address,
        factories: &FactoryRegistry,
    ) -> Result<PoolMatch, PoolRejection> {
        match self.reader.has_code(candidate) {
            Ok(true) => {}
            Ok(false) => return Err(PoolRejection::NoCode),
            Err(e) => return Err(PoolRejection::CodeLookup(e)),
        }

        let factory = self.query_address(candidate, &uniswap_v2::FACTORY, uniswap_v2::factory_call()?)?;
        let version = factories
            .whitelisted_version(factory)
            .ok_or(PoolRejection::FactoryNotWhitelisted(factory))?;

        let token0 = self.query_address(candidate, &uniswap_v2::TOKEN0, uniswap_v2::token0_call()?)?;
        let token1 = self.query_address(candidate, &uniswap_v2::TOKEN1, uniswap_v2::token1_call()?)?;

        let (canonical, fee) = match version {
            ProtocolVersion::V2 => {
                let calldata = uniswap_v2::get_pair_call(token0, token1)?;
                let pair = self.query_address(factory, &uniswap_v2::GET_PAIR, calldata)?;
                (pair, None)
            }
            ProtocolVersion::V3 => {
                let raw = self.call(candidate, &uniswap_v3::FEE, &uniswap_v3::fee_call()?)?;
                let fee = decode_fee_tier(&uniswap_v3::FEE, &raw)?;
                let calldata = uniswap_v3::get_pool_call(token0, token1, fee)?;
                let pool = self.query_address(factory, &uniswap_v3::GET_POOL, calldata)?;
                (pool, Some(fee))
            }
            ProtocolVersion::Unsupported(tag) => return Err(PoolRejection::UnsupportedVersion(tag)),
        };

        if canonical != candidate {
            return Err(PoolRejection::NotCanonical { canonical });
        }

        Ok(PoolMatch {
            pool: candidate,
            factory,
            version,
            token0,
            token1,
            fee,
        })
    }

    fn call(&self, target: Address, function: &Function, calldata: &[u8]) -> Result<Vec<u8>, PoolRejection> {
        self.reader
            .static_call(target, calldata, self.settings.query_gas_limit)
            .map_err(|source| PoolRejection::QueryFailed {
                function: function_label(function),
                source,
            })
    }

    fn query_address(
        &self,
        target: Address,
        function: &Function,
        calldata: Vec<u8>,
    ) -> Result<Address, PoolRejection> {
        let raw = self.call(target, function, &calldata)?;
        Ok(decode_address(function, &raw)?)
    }
}

fn function_label(function: &Function) -> &'static str {
    match function.name.as_str() {
        "factory" => "factory()",
        "token0" => "token0()",
        "token1" => "token1()",
        "fee" => "fee()",
        "getPair" => "getPair(address,address)",
        "getPool" => "getPool(address,address,uint24)",
        _ => "unknown",
    }
}
