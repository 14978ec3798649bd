//! # Guard Simulator
//!
//! Offline harness for the directional transfer guard. Replays scenario
//! files against a guard whose pools live on an [`InMemoryChain`], either
//! one transfer at a time or concurrently through a
//! [`SharedLedger`](guard::SharedLedger).

pub mod replay;
pub mod scenario;
pub mod telemetry;

pub use replay::{replay_parallel, replay_sequential, Outcome, ReplayReport, TransferOutcome};
pub use scenario::{parse_amount, PoolEntry, Scenario, TransferStep};

use anyhow::{Context, Result};
use guard::{ChainReader, InMemoryChain, SharedLedger, TransferGuard};
use guard_config::{bootstrap_registries, GuardSettings};
use std::sync::Arc;

/// Construct a guard from settings and seed its registries.
pub fn build_guard<R: ChainReader>(settings: &GuardSettings, reader: R) -> Result<TransferGuard<R>> {
    let mut guard = TransferGuard::new(
        settings.guard.protected_token,
        settings.guard.owner,
        reader,
        settings.oracle,
    )
    .context("Failed to construct guard")?;
    bootstrap_registries(settings, &mut guard)?;
    Ok(guard)
}

/// Build a guard over the scenario's chain and replay it in file order.
pub fn run_sequential(settings: &GuardSettings, scenario: &Scenario) -> Result<ReplayReport> {
    let mut guard = build_guard(settings, scenario.build_chain()?)?;
    Ok(replay_sequential(&mut guard, &scenario.transfers))
}

/// Build a guard over the scenario's chain and replay it concurrently.
pub async fn run_parallel(
    settings: &GuardSettings,
    scenario: Scenario,
    workers: usize,
) -> Result<ReplayReport> {
    let guard: TransferGuard<InMemoryChain> = build_guard(settings, scenario.build_chain()?)?;
    replay_parallel(
        Arc::new(guard),
        Arc::new(SharedLedger::new()),
        scenario.transfers,
        workers,
    )
    .await
}
