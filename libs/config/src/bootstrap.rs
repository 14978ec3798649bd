//! Seed a freshly constructed guard from settings
//!
//! Writes go through the guard's owner-gated administrative surface, so a
//! bad entry (zero address, unknown version tag) fails the same way it
//! would for a live administrator.

use anyhow::{Context, Result};
use guard::{ChainReader, TransferGuard};
use tracing::info;

use crate::settings::GuardSettings;

pub fn bootstrap_registries<R: ChainReader>(
    settings: &GuardSettings,
    guard: &mut TransferGuard<R>,
) -> Result<()> {
    let owner = guard.owner();

    if !settings.exemptions.is_empty() {
        let flags = vec![true; settings.exemptions.len()];
        guard
            .set_exemption_batch(owner, &settings.exemptions, &flags)
            .context("Failed to apply configured exemptions")?;
    }

    for entry in &settings.factories {
        guard
            .set_factory_whitelist(owner, entry.address, entry.version, entry.whitelisted)
            .with_context(|| format!("Failed to register factory {:?}", entry.address))?;
    }

    info!(
        exemptions = settings.exemptions.len(),
        factories = settings.factories.len(),
        "guard registries bootstrapped"
    );
    Ok(())
}
