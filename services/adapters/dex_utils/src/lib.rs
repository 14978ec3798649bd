//! Shared DEX ABI library
//!
//! Canonical ABI definitions for the read-only interface the transfer guard
//! uses to confirm that an address is a genuine liquidity pool.
//!
//! # Architecture
//!
//! ```text
//! dex_utils/
//! └── abi/
//!     ├── mod.rs         # AbiError + output decoding helpers
//!     ├── uniswap_v2.rs  # pair reads (factory/token0/token1) + getPair
//!     └── uniswap_v3.rs  # fee + getPool
//! ```
//!
//! # Design Principles
//! - Single canonical source for pool/factory function ABIs
//! - Encoding and decoding through `ethabi`, never by hand
//! - Semantic validation on decode (e.g. `uint24` range for fee tiers)

pub mod abi;

pub use abi::{decode_address, decode_fee_tier, AbiError};
