//! Transfer direction and the per-epoch direction bit set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way value moved for an account in a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Sent => Direction::Received,
            Direction::Received => Direction::Sent,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Direction::Sent => DirectionFlags::SENT,
            Direction::Received => DirectionFlags::RECEIVED,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => f.write_str("sent"),
            Direction::Received => f.write_str("received"),
        }
    }
}

/// Two-bit set recording the directions an account moved value in during
/// one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionFlags(u8);

impl DirectionFlags {
    pub const SENT: u8 = 0b01;
    pub const RECEIVED: u8 = 0b10;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits; anything outside the two named bits is dropped.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & (Self::SENT | Self::RECEIVED))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Set the bit for `direction`. Returns `true` if it was not already set.
    pub fn insert(&mut self, direction: Direction) -> bool {
        let newly_set = !self.contains(direction);
        self.0 |= direction.bit();
        newly_set
    }

    /// Clear the bit for `direction`.
    ///
    /// Committed ledger bits are never cleared; this exists so an aborted
    /// ledger transaction can undo the bits it set itself.
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// True if recording `direction` would complete a same-epoch round trip.
    pub const fn would_switch(self, direction: Direction) -> bool {
        self.contains(direction.opposite())
    }
}

impl fmt::Display for DirectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.contains(Direction::Sent),
            self.contains(Direction::Received),
        ) {
            (false, false) => f.write_str("-"),
            (true, false) => f.write_str("S"),
            (false, true) => f.write_str("R"),
            (true, true) => f.write_str("SR"),
        }
    }
}
