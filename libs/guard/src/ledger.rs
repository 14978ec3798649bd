//! Directional limit engine
//!
//! Per-account, per-epoch record of the directions value moved in, and the
//! switch rule: once an account has moved value one way in an epoch, moving
//! it the other way in the same epoch is rejected. Repeating the same
//! direction is always allowed.
//!
//! Writes go through a [`LedgerTx`] so that a transfer touching two accounts
//! either records both sides or neither.

use std::collections::HashMap;

use tracing::trace;
use types::{Address, Direction, DirectionFlags, Epoch};

use crate::error::LimitExceeded;

/// Composite ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    pub account: Address,
    pub epoch: Epoch,
}

impl LedgerKey {
    pub const fn new(account: Address, epoch: Epoch) -> Self {
        Self { account, epoch }
    }
}

/// The direction ledger. Absent entries read as all bits clear.
#[derive(Debug, Default)]
pub struct DirectionLedger {
    entries: HashMap<LedgerKey, DirectionFlags>,
}

impl DirectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self, account: Address, epoch: Epoch) -> DirectionFlags {
        self.entries
            .get(&LedgerKey::new(account, epoch))
            .copied()
            .unwrap_or_default()
    }

    /// Record `direction` for `account` in `epoch`, rejecting a switch.
    ///
    /// On rejection nothing is written.
    pub fn record_and_check(
        &mut self,
        account: Address,
        epoch: Epoch,
        direction: Direction,
    ) -> Result<(), LimitExceeded> {
        let mut tx = self.begin();
        tx.record_and_check(account, epoch, direction)?;
        tx.commit();
        Ok(())
    }

    /// Open a transaction. Bits set through it are undone unless
    /// [`LedgerTx::commit`] is called.
    pub fn begin(&mut self) -> LedgerTx<'_> {
        LedgerTx {
            ledger: self,
            undo: Vec::new(),
            committed: false,
        }
    }

    /// Drop every entry for epochs strictly before `epoch`. Returns the
    /// number of entries removed.
    pub fn prune_before(&mut self, epoch: Epoch) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.epoch >= epoch);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A unit of work over the ledger.
pub struct LedgerTx<'a> {
    ledger: &'a mut DirectionLedger,
    undo: Vec<(LedgerKey, Direction)>,
    committed: bool,
}

impl LedgerTx<'_> {
    pub fn record_and_check(
        &mut self,
        account: Address,
        epoch: Epoch,
        direction: Direction,
    ) -> Result<(), LimitExceeded> {
        let key = LedgerKey::new(account, epoch);
        let flags = self.ledger.entries.get(&key).copied().unwrap_or_default();

        if flags.would_switch(direction) {
            return Err(LimitExceeded {
                account,
                epoch,
                attempted: direction,
            });
        }

        let entry = self.ledger.entries.entry(key).or_default();
        if entry.insert(direction) {
            self.undo.push((key, direction));
        }
        trace!(account = ?account, %epoch, %direction, flags = %entry, "direction recorded");
        Ok(())
    }

    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for LedgerTx<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for (key, direction) in self.undo.drain(..).rev() {
            if let Some(flags) = self.ledger.entries.get_mut(&key) {
                flags.remove(direction);
                if flags.is_empty() {
                    self.ledger.entries.remove(&key);
                }
            }
        }
    }
}
