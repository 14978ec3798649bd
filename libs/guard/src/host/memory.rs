//! Scripted in-memory host chain
//!
//! Contracts are addresses with a table of canned responses keyed by exact
//! calldata (falling back to the 4-byte selector). Anything unscripted
//! reverts, which is how a real contract without the queried function
//! behaves. Used by unit tests, the workspace scenario tests and the
//! simulator's replay mode.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use dex::abi::{uniswap_v2, uniswap_v3};
use ethabi::Token;
use types::Address;

use super::{CallError, ChainReader};

/// Gas charged by a scripted response unless overridden.
pub const DEFAULT_CALL_GAS: u64 = 2_600;

/// What a scripted call does when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Return(Vec<u8>),
    Revert,
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    outcome: CallOutcome,
    gas_used: u64,
}

/// A deployed contract whose behaviour is a lookup table.
#[derive(Debug, Clone, Default)]
pub struct ScriptedContract {
    exact: HashMap<Vec<u8>, ScriptedResponse>,
    by_selector: HashMap<[u8; 4], ScriptedResponse>,
}

impl ScriptedContract {
    /// Answer `calldata` with `outcome`, charging `gas_used`.
    pub fn respond(&mut self, calldata: Vec<u8>, outcome: CallOutcome, gas_used: u64) -> &mut Self {
        self.exact.insert(calldata, ScriptedResponse { outcome, gas_used });
        self
    }

    /// Answer any call whose selector is `selector`, regardless of arguments.
    pub fn respond_to_selector(
        &mut self,
        selector: [u8; 4],
        outcome: CallOutcome,
        gas_used: u64,
    ) -> &mut Self {
        self.by_selector
            .insert(selector, ScriptedResponse { outcome, gas_used });
        self
    }

    /// Answer `calldata` with ABI-encoded `tokens`.
    pub fn returns(&mut self, calldata: Vec<u8>, tokens: &[Token]) -> &mut Self {
        self.respond(calldata, CallOutcome::Return(ethabi::encode(tokens)), DEFAULT_CALL_GAS)
    }

    pub fn reverts(&mut self, calldata: Vec<u8>) -> &mut Self {
        self.respond(calldata, CallOutcome::Revert, DEFAULT_CALL_GAS)
    }

    fn lookup(&self, calldata: &[u8]) -> Option<&ScriptedResponse> {
        self.exact.get(calldata).or_else(|| {
            let selector: [u8; 4] = calldata.get(..4)?.try_into().ok()?;
            self.by_selector.get(&selector)
        })
    }
}

/// In-memory host: a set of scripted contracts. Addresses without a contract
/// are plain accounts with no code.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    contracts: HashMap<Address, ScriptedContract>,
    calls: AtomicUsize,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy (or fetch) the scripted contract at `address`.
    pub fn deploy(&mut self, address: Address) -> &mut ScriptedContract {
        self.contracts.entry(address).or_default()
    }

    pub fn contract_mut(&mut self, address: Address) -> Option<&mut ScriptedContract> {
        self.contracts.get_mut(&address)
    }

    /// Number of `static_call`s executed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Deploy a contract answering the shared pair getters
    /// (`factory`, `token0`, `token1`).
    pub fn deploy_pair_like(
        &mut self,
        pair: Address,
        factory: Address,
        token0: Address,
        token1: Address,
    ) -> &mut ScriptedContract {
        let contract = self.deploy(pair);
        if let Ok(calldata) = uniswap_v2::factory_call() {
            contract.returns(calldata, &[Token::Address(factory)]);
        }
        if let Ok(calldata) = uniswap_v2::token0_call() {
            contract.returns(calldata, &[Token::Address(token0)]);
        }
        if let Ok(calldata) = uniswap_v2::token1_call() {
            contract.returns(calldata, &[Token::Address(token1)]);
        }
        contract
    }

    /// Deploy a V2 pair and register it with its factory (both token orders,
    /// as `getPair` is symmetric on-chain).
    pub fn deploy_v2_pair(
        &mut self,
        pair: Address,
        factory: Address,
        token0: Address,
        token1: Address,
    ) {
        self.deploy_pair_like(pair, factory, token0, token1);
        self.register_v2_pair(factory, token0, token1, pair);
    }

    /// Make `factory.getPair(token0, token1)` return `pair`.
    pub fn register_v2_pair(
        &mut self,
        factory: Address,
        token0: Address,
        token1: Address,
        pair: Address,
    ) {
        let contract = self.deploy(factory);
        for (a, b) in [(token0, token1), (token1, token0)] {
            if let Ok(calldata) = uniswap_v2::get_pair_call(a, b) {
                contract.returns(calldata, &[Token::Address(pair)]);
            }
        }
    }

    /// Deploy a V3 pool with `fee` and register it with its factory.
    pub fn deploy_v3_pool(
        &mut self,
        pool: Address,
        factory: Address,
        token0: Address,
        token1: Address,
        fee: u32,
    ) {
        let contract = self.deploy_pair_like(pool, factory, token0, token1);
        if let Ok(calldata) = uniswap_v3::fee_call() {
            contract.returns(calldata, &[Token::Uint(fee.into())]);
        }
        self.register_v3_pool(factory, token0, token1, fee, pool);
    }

    /// Make `factory.getPool(token0, token1, fee)` return `pool`.
    pub fn register_v3_pool(
        &mut self,
        factory: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        pool: Address,
    ) {
        let contract = self.deploy(factory);
        for (a, b) in [(token0, token1), (token1, token0)] {
            if let Ok(calldata) = uniswap_v3::get_pool_call(a, b, fee) {
                contract.returns(calldata, &[Token::Address(pool)]);
            }
        }
    }
}

impl ChainReader for InMemoryChain {
    fn has_code(&self, account: Address) -> Result<bool, CallError> {
        Ok(self.contracts.contains_key(&account))
    }

    fn static_call(
        &self,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Result<Vec<u8>, CallError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let contract = self.contracts.get(&target).ok_or(CallError::NoCode)?;
        let response = contract.lookup(calldata).ok_or(CallError::Reverted)?;

        if response.gas_used > gas_limit {
            return Err(CallError::OutOfGas { limit: gas_limit });
        }
        match &response.outcome {
            CallOutcome::Return(data) => Ok(data.clone()),
            CallOutcome::Revert => Err(CallError::Reverted),
        }
    }
}
