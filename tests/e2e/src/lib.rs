//! End-to-end harness for the directional transfer guard
//!
//! Builds a guard over an in-memory chain with one whitelisted V2 factory and
//! one whitelisted V3 factory, and drives it the way the protected token
//! would.

pub mod fixtures;

pub use fixtures::{addr, Harness, ASSET_A, ASSET_B, OWNER, TOKEN, V2_FACTORY, V3_FACTORY};
