//! # Directional Transfer Guard
//!
//! Transfer-time guard against sandwich and front-running patterns on a
//! fungible token. Each account may move value in only one direction per
//! epoch (block): once it has received it cannot send in the same epoch, and
//! once it has sent it cannot receive. Same-direction repeats are free.
//!
//! Liquidity pools buy and sell every block, so addresses confirmed as pools
//! of a whitelisted factory are exempt, as are administratively exempt
//! accounts.
//!
//! ## Architecture
//!
//! ```text
//! token ──on_transfer──▶ TransferGuard
//!                          │  caller check, skip rules
//!                          ├─▶ ExemptionRegistry
//!                          ├─▶ PairOracle ──▶ ChainReader (code, static calls)
//!                          │        └─▶ FactoryRegistry
//!                          └─▶ DirectionLedger (one transaction per transfer)
//! ```
//!
//! [`SharedLedger`] carries the same rule for multi-threaded harnesses.

pub mod error;
pub mod events;
pub mod guard;
pub mod host;
pub mod ledger;
pub mod oracle;
pub mod registry;
pub mod shared_ledger;

pub use error::{GuardError, LimitExceeded, Result};
pub use events::{EventLog, GuardEvent};
pub use guard::{CallContext, PartyStatus, TransferGuard, TransferPlan};
pub use host::{CallError, CallOutcome, ChainReader, InMemoryChain, ScriptedContract};
pub use ledger::{DirectionLedger, LedgerKey, LedgerTx};
pub use oracle::{OracleSettings, PairOracle, PoolMatch, PoolRejection, DEFAULT_QUERY_GAS_LIMIT};
pub use registry::{ExemptionRegistry, FactoryRecord, FactoryRegistry};
pub use shared_ledger::SharedLedger;
