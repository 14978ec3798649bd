//! Change notifications for administrative writes
//!
//! Observability only: nothing in the guard reads these back.

use serde::Serialize;
use tracing::info;
use types::{Address, ProtocolVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GuardEvent {
    ExemptionUpdated {
        account: Address,
        is_exempt: bool,
    },
    FactoryWhitelistUpdated {
        factory: Address,
        version: ProtocolVersion,
        whitelisted: bool,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

/// Append-only log of emitted notifications, drained by whoever publishes
/// them.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GuardEvent>,
}

impl EventLog {
    pub fn emit(&mut self, event: GuardEvent) {
        match &event {
            GuardEvent::ExemptionUpdated { account, is_exempt } => {
                info!(account = ?account, is_exempt, "exemption updated");
            }
            GuardEvent::FactoryWhitelistUpdated {
                factory,
                version,
                whitelisted,
            } => {
                info!(factory = ?factory, %version, whitelisted, "factory whitelist updated");
            }
            GuardEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => {
                info!(previous_owner = ?previous_owner, new_owner = ?new_owner, "ownership transferred");
            }
        }
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GuardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
