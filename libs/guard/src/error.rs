//! Guard error taxonomy
//!
//! Only decisions and administrative misuse surface as errors. Failed host
//! queries inside the pair oracle are recovered locally and never appear here.

use thiserror::Error;
use types::{Address, Direction, Epoch};

/// The direction-switch rule tripped for `account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Directional limit exceeded for {account:?}: already {} in epoch {epoch}", .attempted.opposite())]
pub struct LimitExceeded {
    pub account: Address,
    pub epoch: Epoch,
    pub attempted: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),

    #[error("Unauthorized caller {0:?}: only the protected token may invoke the guard")]
    UnauthorizedCaller(Address),

    #[error("Caller {0:?} is not the guard owner")]
    NotOwner(Address),

    #[error("Zero address is not allowed")]
    InvalidAddress,

    #[error("Array length mismatch: {accounts} accounts, {flags} flags")]
    ArrayLengthMismatch { accounts: usize, flags: usize },

    #[error("Unsupported factory version tag {0}")]
    InvalidFactoryVersion(u8),
}

impl GuardError {
    /// The account whose directional limit was exceeded, if that is the cause.
    pub fn limited_account(&self) -> Option<Address> {
        match self {
            GuardError::LimitExceeded(e) => Some(e.account),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
