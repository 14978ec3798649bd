//! # Guard Types
//!
//! Primitive types shared by the directional transfer guard, its chain
//! adapters and the simulator.
//!
//! ## Contents
//!
//! - [`Address`] / [`U256`]: EVM account identifiers and amounts, re-exported
//!   from `ethereum-types` so they line up with `ethabi` and `web3`
//! - [`Epoch`]: the host ledger's block number, the time granularity of the
//!   direction ledger
//! - [`Direction`] / [`DirectionFlags`]: which way value moved for an account
//!   within one epoch
//! - [`ProtocolVersion`]: the pool protocol a whitelisted factory deploys

pub mod direction;
pub mod version;

pub use direction::{Direction, DirectionFlags};
pub use ethereum_types::{H160 as Address, U256};
pub use version::ProtocolVersion;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete production step of the host ledger (its block number).
///
/// Supplied by the execution environment on every guarded call; the guard
/// never mints epochs of its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(pub u64);

impl Epoch {
    pub const fn new(block_number: u64) -> Self {
        Self(block_number)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The following epoch, saturating at `u64::MAX`.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for Epoch {
    fn from(block_number: u64) -> Self {
        Self(block_number)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
