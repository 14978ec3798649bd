//! Guard entry point and administrative surface
//!
//! [`TransferGuard::on_transfer`] is what the protected token calls once per
//! transfer. It resolves which sides of the transfer are subject to the
//! directional limit (neither exempt nor a recognized pool) and records
//! both inside one ledger transaction, so a rejection on the receiving side
//! also unwinds the sending side.

use serde::Serialize;
use tracing::{trace, warn};
use types::{Address, Direction, DirectionFlags, Epoch, ProtocolVersion, U256};

use crate::error::{GuardError, Result};
use crate::events::{EventLog, GuardEvent};
use crate::host::ChainReader;
use crate::ledger::DirectionLedger;
use crate::oracle::{OracleSettings, PairOracle};
use crate::registry::{ExemptionRegistry, FactoryRecord, FactoryRegistry};

/// Who is calling and in which epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub epoch: Epoch,
}

impl CallContext {
    pub const fn new(caller: Address, epoch: Epoch) -> Self {
        Self { caller, epoch }
    }
}

/// How the guard treats one side of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyStatus {
    Exempt,
    Pool,
    Limited,
}

/// The limited sides of an authorized transfer, ready to be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    pub epoch: Epoch,
    pub sender: Option<Address>,
    pub receiver: Option<Address>,
}

impl TransferPlan {
    fn skipped(epoch: Epoch) -> Self {
        Self {
            epoch,
            sender: None,
            receiver: None,
        }
    }

    /// Nothing to record.
    pub fn is_noop(&self) -> bool {
        self.sender.is_none() && self.receiver.is_none()
    }
}

pub struct TransferGuard<R> {
    protected_token: Address,
    owner: Address,
    exemptions: ExemptionRegistry,
    factories: FactoryRegistry,
    oracle: PairOracle<R>,
    ledger: DirectionLedger,
    events: EventLog,
}

impl<R: ChainReader> TransferGuard<R> {
    /// The protected token is fixed for the guard's lifetime.
    pub fn new(
        protected_token: Address,
        owner: Address,
        reader: R,
        settings: OracleSettings,
    ) -> Result<Self> {
        if protected_token.is_zero() || owner.is_zero() {
            return Err(GuardError::InvalidAddress);
        }
        Ok(Self {
            protected_token,
            owner,
            exemptions: ExemptionRegistry::new(),
            factories: FactoryRegistry::new(),
            oracle: PairOracle::new(reader, settings),
            ledger: DirectionLedger::new(),
            events: EventLog::default(),
        })
    }

    /// Guard hook for one token transfer. Rejects with `LimitExceeded` if
    /// either limited side would switch direction within `ctx.epoch`; in that
    /// case no ledger state changes.
    pub fn on_transfer(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: U256,
        is_special_flow: bool,
    ) -> Result<()> {
        let plan = self.plan_transfer(ctx, from, to, amount, is_special_flow)?;
        if plan.is_noop() {
            return Ok(());
        }

        let mut tx = self.ledger.begin();
        for (account, direction) in [
            (plan.sender, Direction::Sent),
            (plan.receiver, Direction::Received),
        ] {
            if let Some(account) = account {
                if let Err(e) = tx.record_and_check(account, plan.epoch, direction) {
                    warn!(
                        account = ?e.account,
                        epoch = %e.epoch,
                        attempted = %e.attempted,
                        from = ?from,
                        to = ?to,
                        "transfer rejected: direction switch within epoch"
                    );
                    return Err(e.into());
                }
            }
        }
        tx.commit();
        Ok(())
    }

    /// Authorize the caller, apply the skip rules and classify both sides.
    /// Read-only; shared by [`on_transfer`](Self::on_transfer) and
    /// concurrent harnesses that record through a
    /// [`SharedLedger`](crate::SharedLedger).
    pub fn plan_transfer(
        &self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: U256,
        is_special_flow: bool,
    ) -> Result<TransferPlan> {
        if ctx.caller != self.protected_token {
            return Err(GuardError::UnauthorizedCaller(ctx.caller));
        }

        if is_special_flow || from == to || amount.is_zero() {
            trace!(from = ?from, to = ?to, %amount, is_special_flow, "transfer skipped");
            return Ok(TransferPlan::skipped(ctx.epoch));
        }

        let limited = |account: Address| {
            (self.classify(account) == PartyStatus::Limited).then_some(account)
        };

        Ok(TransferPlan {
            epoch: ctx.epoch,
            sender: limited(from),
            receiver: limited(to),
        })
    }

    /// Exempt accounts short-circuit the pool check.
    pub fn classify(&self, account: Address) -> PartyStatus {
        if self.exemptions.is_exempt(account) {
            PartyStatus::Exempt
        } else if self.oracle.is_recognized_pool(account, &self.factories) {
            PartyStatus::Pool
        } else {
            PartyStatus::Limited
        }
    }

    pub fn set_exemption(&mut self, caller: Address, account: Address, is_exempt: bool) -> Result<()> {
        self.only_owner(caller)?;
        if account.is_zero() {
            return Err(GuardError::InvalidAddress);
        }
        self.write_exemption(account, is_exempt);
        Ok(())
    }

    /// All-or-nothing: validated in full before anything is written.
    pub fn set_exemption_batch(
        &mut self,
        caller: Address,
        accounts: &[Address],
        flags: &[bool],
    ) -> Result<()> {
        self.only_owner(caller)?;
        if accounts.len() != flags.len() {
            return Err(GuardError::ArrayLengthMismatch {
                accounts: accounts.len(),
                flags: flags.len(),
            });
        }
        if accounts.iter().any(|account| account.is_zero()) {
            return Err(GuardError::InvalidAddress);
        }
        for (account, is_exempt) in accounts.iter().zip(flags) {
            self.write_exemption(*account, *is_exempt);
        }
        Ok(())
    }

    pub fn set_factory_whitelist(
        &mut self,
        caller: Address,
        factory: Address,
        version_tag: u8,
        whitelisted: bool,
    ) -> Result<()> {
        self.only_owner(caller)?;
        if factory.is_zero() {
            return Err(GuardError::InvalidAddress);
        }
        let version = ProtocolVersion::from_tag(version_tag);
        if !version.is_supported() {
            return Err(GuardError::InvalidFactoryVersion(version_tag));
        }

        self.factories.set(
            factory,
            FactoryRecord {
                whitelisted,
                version,
            },
        );
        self.events.emit(GuardEvent::FactoryWhitelistUpdated {
            factory,
            version,
            whitelisted,
        });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(GuardError::InvalidAddress);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        self.events.emit(GuardEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    pub fn protected_token(&self) -> Address {
        self.protected_token
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_exempt(&self, account: Address) -> bool {
        self.exemptions.is_exempt(account)
    }

    pub fn factory_record(&self, factory: Address) -> Option<FactoryRecord> {
        self.factories.get(factory)
    }

    pub fn direction_flags(&self, account: Address, epoch: Epoch) -> DirectionFlags {
        self.ledger.flags(account, epoch)
    }

    pub fn oracle(&self) -> &PairOracle<R> {
        &self.oracle
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GuardEvent> {
        self.events.drain()
    }

    /// Forget ledger entries older than `epoch`.
    pub fn prune_ledger_before(&mut self, epoch: Epoch) -> usize {
        self.ledger.prune_before(epoch)
    }

    fn only_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(GuardError::NotOwner(caller));
        }
        Ok(())
    }

    fn write_exemption(&mut self, account: Address, is_exempt: bool) {
        self.exemptions.set(account, is_exempt);
        self.events
            .emit(GuardEvent::ExemptionUpdated { account, is_exempt });
    }
}
