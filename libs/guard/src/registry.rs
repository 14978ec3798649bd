//! Administrator-maintained registries read on every guarded transfer
//!
//! Access control lives in [`TransferGuard`](crate::TransferGuard); these
//! maps only hold the data.

use std::collections::HashMap;

use serde::Serialize;
use types::{Address, ProtocolVersion};

/// Accounts excluded from directional-limit enforcement.
#[derive(Debug, Default, Clone)]
pub struct ExemptionRegistry {
    flags: HashMap<Address, bool>,
}

impl ExemptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exempt(&self, account: Address) -> bool {
        self.flags.get(&account).copied().unwrap_or(false)
    }

    pub fn set(&mut self, account: Address, is_exempt: bool) {
        self.flags.insert(account, is_exempt);
    }
}

/// What the registry knows about a pool factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactoryRecord {
    pub whitelisted: bool,
    /// Only meaningful while `whitelisted` is set.
    pub version: ProtocolVersion,
}

/// Known liquidity-pool factories.
#[derive(Debug, Default, Clone)]
pub struct FactoryRegistry {
    records: HashMap<Address, FactoryRecord>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, factory: Address) -> Option<FactoryRecord> {
        self.records.get(&factory).copied()
    }

    /// The protocol version of `factory` if it is whitelisted.
    pub fn whitelisted_version(&self, factory: Address) -> Option<ProtocolVersion> {
        self.records
            .get(&factory)
            .filter(|record| record.whitelisted)
            .map(|record| record.version)
    }

    pub fn set(&mut self, factory: Address, record: FactoryRecord) {
        self.records.insert(factory, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
