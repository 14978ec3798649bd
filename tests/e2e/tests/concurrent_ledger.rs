//! Many transfers recorded concurrently through the shared ledger

use guard::{SharedLedger, TransferGuard};
use guard_e2e_tests::{addr, Harness, ASSET_A, ASSET_B, V2_FACTORY};
use std::sync::Arc;
use types::{Direction, Epoch, U256};

fn shared_guard(pool: types::Address) -> Arc<TransferGuard<guard::InMemoryChain>> {
    let h = Harness::with_chain(|chain| {
        chain.deploy_v2_pair(pool, V2_FACTORY, ASSET_A, ASSET_B);
    });
    Arc::new(h.guard)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_no_account_switches_direction_under_contention() {
    let pool = addr(0xa1);
    let guard = shared_guard(pool);
    let ledger = Arc::new(SharedLedger::new());
    let epoch = Epoch::new(77);

    // Every worker shuffles value around a small ring of accounts plus the pool
    let mut handles = Vec::new();
    for worker in 0..8u64 {
        let guard = Arc::clone(&guard);
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::task::spawn_blocking(move || {
            let mut accepted = Vec::new();
            for i in 0..200u64 {
                let from = if i % 5 == 0 { pool } else { addr(1 + (worker + i) % 6) };
                let to = if i % 7 == 0 { pool } else { addr(1 + (worker * 3 + i) % 6) };
                let ctx = Harness::ctx(epoch.as_u64());
                let recorded = guard
                    .plan_transfer(&ctx, from, to, U256::one(), false)
                    .and_then(|plan| {
                        ledger
                            .record_transfer(plan.epoch, plan.sender, plan.receiver)
                            .map_err(Into::into)
                    });
                if recorded.is_ok() {
                    accepted.push((from, to));
                }
            }
            accepted
        }));
    }

    let mut accepted = Vec::new();
    for handle in handles {
        accepted.extend(handle.await.unwrap());
    }

    // Every accepted transfer agrees with the final flags
    for (from, to) in accepted {
        if from == to {
            continue;
        }
        if from != pool {
            let flags = ledger.flags(from, epoch);
            assert!(flags.contains(Direction::Sent));
            assert!(!flags.contains(Direction::Received));
        }
        if to != pool {
            let flags = ledger.flags(to, epoch);
            assert!(flags.contains(Direction::Received));
            assert!(!flags.contains(Direction::Sent));
        }
    }
    assert!(ledger.flags(pool, epoch).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_epochs_do_not_interfere() {
    let guard = shared_guard(addr(0xa1));
    let ledger = Arc::new(SharedLedger::new());

    let mut handles = Vec::new();
    for epoch in 0..16u64 {
        let guard = Arc::clone(&guard);
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::task::spawn_blocking(move || {
            let ctx = Harness::ctx(epoch);
            // Alternate which side of the pair receives first
            let (first, second) = if epoch % 2 == 0 {
                (addr(1), addr(2))
            } else {
                (addr(2), addr(1))
            };
            let plan = guard
                .plan_transfer(&ctx, first, second, U256::one(), false)
                .unwrap();
            ledger
                .record_transfer(plan.epoch, plan.sender, plan.receiver)
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for epoch in 0..16u64 {
        let sender = if epoch % 2 == 0 { addr(1) } else { addr(2) };
        assert!(ledger
            .flags(sender, Epoch::new(epoch))
            .contains(Direction::Sent));
    }
    assert_eq!(ledger.len(), 32);
}
