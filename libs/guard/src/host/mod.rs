//! Host chain interface
//!
//! The guard never talks to a node or an EVM directly. Everything it needs
//! from the host (code presence and budgeted read-only calls) goes through
//! [`ChainReader`], so the same oracle runs against the scripted
//! [`InMemoryChain`] in tests and against a JSON-RPC node in the adapters.

pub mod memory;

pub use memory::{CallOutcome, InMemoryChain, ScriptedContract};

use types::Address;

/// Failure of a single host query. Never fatal to the guard: the oracle folds
/// every variant into "not a pool".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("call reverted")]
    Reverted,

    #[error("call exceeded gas budget of {limit}")]
    OutOfGas { limit: u64 },

    #[error("target has no code")]
    NoCode,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Read-only view of the host chain.
pub trait ChainReader {
    /// Whether `account` has executable code deployed.
    fn has_code(&self, account: Address) -> Result<bool, CallError>;

    /// Execute a read-only call against `target` with at most `gas_limit`
    /// gas and return the raw return data.
    fn static_call(
        &self,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Result<Vec<u8>, CallError>;
}

impl<R: ChainReader + ?Sized> ChainReader for &R {
    fn has_code(&self, account: Address) -> Result<bool, CallError> {
        (**self).has_code(account)
    }

    fn static_call(
        &self,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Result<Vec<u8>, CallError> {
        (**self).static_call(target, calldata, gas_limit)
    }
}

impl<R: ChainReader + ?Sized> ChainReader for std::sync::Arc<R> {
    fn has_code(&self, account: Address) -> Result<bool, CallError> {
        (**self).has_code(account)
    }

    fn static_call(
        &self,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Result<Vec<u8>, CallError> {
        (**self).static_call(target, calldata, gas_limit)
    }
}
