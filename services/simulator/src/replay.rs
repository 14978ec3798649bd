//! Scenario replay
//!
//! Sequential replay drives [`TransferGuard::on_transfer`] exactly as the
//! token would. Parallel replay shares one guard for authorization and
//! classification and records through a [`SharedLedger`], spreading the
//! transfers of each epoch over blocking worker tasks; epochs themselves are
//! replayed in order.

use anyhow::{Context, Result};
use guard::{CallContext, ChainReader, GuardError, SharedLedger, TransferGuard};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use types::{Address, Epoch};

use crate::scenario::TransferStep;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Rejected { reason: String, account: Option<Address> },
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub index: usize,
    pub epoch: Epoch,
    pub from: Address,
    pub to: Address,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub accepted: usize,
    pub rejected: usize,
    pub outcomes: Vec<TransferOutcome>,
}

impl ReplayReport {
    fn push(&mut self, outcome: TransferOutcome) {
        match outcome.outcome {
            Outcome::Accepted => self.accepted += 1,
            Outcome::Rejected { .. } => self.rejected += 1,
        }
        self.outcomes.push(outcome);
    }

    fn sort(&mut self) {
        self.outcomes.sort_by_key(|o| o.index);
    }
}

fn outcome_of(index: usize, step: &TransferStep, result: Result<(), GuardError>) -> TransferOutcome {
    let outcome = match result {
        Ok(()) => Outcome::Accepted,
        Err(e) => Outcome::Rejected {
            account: e.limited_account(),
            reason: e.to_string(),
        },
    };
    TransferOutcome {
        index,
        epoch: step.epoch,
        from: step.from,
        to: step.to,
        outcome,
    }
}

fn context_for<R: ChainReader>(guard: &TransferGuard<R>, step: &TransferStep) -> CallContext {
    CallContext::new(step.caller.unwrap_or_else(|| guard.protected_token()), step.epoch)
}

/// Replay transfers in file order.
pub fn replay_sequential<R: ChainReader>(
    guard: &mut TransferGuard<R>,
    transfers: &[TransferStep],
) -> ReplayReport {
    let mut report = ReplayReport::default();

    for (index, step) in transfers.iter().enumerate() {
        let ctx = context_for(guard, step);
        let result = guard.on_transfer(&ctx, step.from, step.to, step.amount, step.special);
        debug!(index, epoch = %step.epoch, ok = result.is_ok(), "replayed transfer");
        report.push(outcome_of(index, step, result));
    }

    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        "sequential replay finished"
    );
    report
}

/// Replay with `workers` concurrent tasks per epoch. Within an epoch the
/// order in which conflicting transfers win is not defined.
pub async fn replay_parallel<R>(
    guard: Arc<TransferGuard<R>>,
    ledger: Arc<SharedLedger>,
    transfers: Vec<TransferStep>,
    workers: usize,
) -> Result<ReplayReport>
where
    R: ChainReader + Send + Sync + 'static,
{
    let workers = workers.max(1);
    let mut by_epoch: BTreeMap<Epoch, Vec<(usize, TransferStep)>> = BTreeMap::new();
    for (index, step) in transfers.into_iter().enumerate() {
        by_epoch.entry(step.epoch).or_default().push((index, step));
    }

    let mut report = ReplayReport::default();
    for (epoch, batch) in by_epoch {
        let chunk_size = batch.len().div_ceil(workers).max(1);
        let mut handles = Vec::with_capacity(workers);

        for chunk in batch.chunks(chunk_size) {
            let chunk = chunk.to_vec();
            let guard = Arc::clone(&guard);
            let ledger = Arc::clone(&ledger);

            handles.push(tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .map(|(index, step)| {
                        let ctx = context_for(&*guard, step);
                        let result = guard
                            .plan_transfer(&ctx, step.from, step.to, step.amount, step.special)
                            .and_then(|plan| {
                                ledger
                                    .record_transfer(plan.epoch, plan.sender, plan.receiver)
                                    .map_err(GuardError::from)
                            });
                        outcome_of(*index, step, result)
                    })
                    .collect::<Vec<_>>()
            }));
        }

        for handle in handles {
            let outcomes = handle
                .await
                .with_context(|| format!("Replay worker for epoch {} panicked", epoch))?;
            for outcome in outcomes {
                report.push(outcome);
            }
        }
        debug!(%epoch, "epoch replayed");
    }

    report.sort();
    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        workers,
        "parallel replay finished"
    );
    Ok(report)
}
