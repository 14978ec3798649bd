//! Well-known addresses and the [`Harness`] wrapper

use guard::{CallContext, GuardEvent, InMemoryChain, OracleSettings, Result, TransferGuard};
use types::{Address, DirectionFlags, Epoch, ProtocolVersion, U256};

pub const TOKEN: Address = fixed(0xaa);
pub const OWNER: Address = fixed(0xbb);
pub const V2_FACTORY: Address = fixed(0xf2);
pub const V3_FACTORY: Address = fixed(0xf3);
pub const ASSET_A: Address = fixed(0x10);
pub const ASSET_B: Address = fixed(0x20);

const fn fixed(low: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = low;
    Address(bytes)
}

/// Shorthand for an account with a small numeric address.
pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

pub struct Harness {
    pub guard: TransferGuard<InMemoryChain>,
}

impl Harness {
    /// Empty chain, both factories whitelisted.
    pub fn new() -> Self {
        Self::with_chain(|_| {})
    }

    /// Let `deploy` populate the chain before the guard takes ownership of it.
    pub fn with_chain(deploy: impl FnOnce(&mut InMemoryChain)) -> Self {
        let mut chain = InMemoryChain::new();
        deploy(&mut chain);

        let mut guard = TransferGuard::new(TOKEN, OWNER, chain, OracleSettings::default())
            .expect("non-zero identities");
        guard
            .set_factory_whitelist(OWNER, V2_FACTORY, ProtocolVersion::V2.tag(), true)
            .expect("owner may whitelist");
        guard
            .set_factory_whitelist(OWNER, V3_FACTORY, ProtocolVersion::V3.tag(), true)
            .expect("owner may whitelist");
        guard.drain_events();
        Self { guard }
    }

    pub fn ctx(epoch: u64) -> CallContext {
        CallContext::new(TOKEN, Epoch::new(epoch))
    }

    /// Ordinary transfer of `amount` in `epoch`.
    pub fn transfer(&mut self, epoch: u64, from: Address, to: Address, amount: u64) -> Result<()> {
        self.guard
            .on_transfer(&Self::ctx(epoch), from, to, U256::from(amount), false)
    }

    pub fn transfer_raw(
        &mut self,
        epoch: u64,
        from: Address,
        to: Address,
        amount: U256,
        is_special_flow: bool,
    ) -> Result<()> {
        self.guard
            .on_transfer(&Self::ctx(epoch), from, to, amount, is_special_flow)
    }

    pub fn flags(&self, account: Address, epoch: u64) -> DirectionFlags {
        self.guard.direction_flags(account, Epoch::new(epoch))
    }

    pub fn exempt(&mut self, account: Address) {
        self.guard
            .set_exemption(OWNER, account, true)
            .expect("owner may exempt");
    }

    pub fn events(&mut self) -> Vec<GuardEvent> {
        self.guard.drain_events()
    }

    pub fn is_pool(&self, candidate: Address) -> bool {
        self.guard
            .oracle()
            .is_recognized_pool(candidate, self.guard.factories())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
