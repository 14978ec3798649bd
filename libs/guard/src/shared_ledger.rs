//! Concurrent direction ledger
//!
//! Same rule as [`DirectionLedger`](crate::ledger::DirectionLedger), for
//! harnesses that replay many transfers from several threads. Entries live
//! in a `DashMap`; check-then-set is serialized per account through a fixed
//! set of striped mutexes. A two-party transfer takes both stripes in
//! ascending order, checks both sides, then writes both, so a rejection
//! never leaves half a transfer behind.

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use types::{Address, Direction, DirectionFlags, Epoch};

use crate::error::LimitExceeded;
use crate::ledger::LedgerKey;

pub const DEFAULT_STRIPES: usize = 64;

#[derive(Debug)]
pub struct SharedLedger {
    entries: DashMap<LedgerKey, DirectionFlags>,
    stripes: Box<[Mutex<()>]>,
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::with_stripes(DEFAULT_STRIPES)
    }
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// `stripes` is clamped to at least one.
    pub fn with_stripes(stripes: usize) -> Self {
        Self {
            entries: DashMap::new(),
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    fn stripe_of(&self, account: Address) -> usize {
        let bytes = account.as_bytes();
        let low = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        low as usize % self.stripes.len()
    }

    pub fn flags(&self, account: Address, epoch: Epoch) -> DirectionFlags {
        self.entries
            .get(&LedgerKey::new(account, epoch))
            .map(|flags| *flags)
            .unwrap_or_default()
    }

    /// Single-account record, atomic with respect to every other call
    /// touching the same account.
    pub fn record_and_check(
        &self,
        account: Address,
        epoch: Epoch,
        direction: Direction,
    ) -> Result<(), LimitExceeded> {
        let _guard = self.stripes[self.stripe_of(account)].lock();
        self.check(account, epoch, direction)?;
        self.set(account, epoch, direction);
        Ok(())
    }

    /// Record both sides of a transfer atomically. `None` marks a side that
    /// is not subject to the limit. A self-transfer records nothing, as at
    /// the entry point.
    pub fn record_transfer(
        &self,
        epoch: Epoch,
        sender: Option<Address>,
        receiver: Option<Address>,
    ) -> Result<(), LimitExceeded> {
        if sender.is_some() && sender == receiver {
            return Ok(());
        }
        let _guards = self.lock_accounts(sender.into_iter().chain(receiver));

        if let Some(account) = sender {
            self.check(account, epoch, Direction::Sent)?;
        }
        if let Some(account) = receiver {
            self.check(account, epoch, Direction::Received)?;
        }
        if let Some(account) = sender {
            self.set(account, epoch, Direction::Sent);
        }
        if let Some(account) = receiver {
            self.set(account, epoch, Direction::Received);
        }
        Ok(())
    }

    pub fn prune_before(&self, epoch: Epoch) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.epoch >= epoch);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lock_accounts(&self, accounts: impl Iterator<Item = Address>) -> Vec<MutexGuard<'_, ()>> {
        let mut indices: Vec<usize> = accounts.map(|a| self.stripe_of(a)).collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| self.stripes[i].lock()).collect()
    }

    fn check(&self, account: Address, epoch: Epoch, direction: Direction) -> Result<(), LimitExceeded> {
        if self.flags(account, epoch).would_switch(direction) {
            return Err(LimitExceeded {
                account,
                epoch,
                attempted: direction,
            });
        }
        Ok(())
    }

    fn set(&self, account: Address, epoch: Epoch, direction: Direction) {
        self.entries
            .entry(LedgerKey::new(account, epoch))
            .or_default()
            .insert(direction);
    }
}
