//! Transfer sequences through the guard entry point

use assert_matches::assert_matches;
use guard::{GuardError, LimitExceeded};
use guard_e2e_tests::{addr, Harness, ASSET_A, ASSET_B, OWNER, TOKEN, V2_FACTORY, V3_FACTORY};
use tracing_test::traced_test;
use types::{Direction, DirectionFlags, Epoch, U256};

#[test]
fn test_receive_then_send_blocked_until_next_epoch() {
    let mut h = Harness::new();
    let (x, y, z, w) = (addr(1), addr(2), addr(3), addr(4));

    h.transfer(10, x, y, 100).unwrap();
    assert!(h.flags(x, 10).contains(Direction::Sent));
    assert!(h.flags(y, 10).contains(Direction::Received));

    // Same-direction repeat
    h.transfer(10, x, z, 50).unwrap();

    let err = h.transfer(10, y, w, 10).unwrap_err();
    assert_eq!(
        err,
        GuardError::LimitExceeded(LimitExceeded {
            account: y,
            epoch: Epoch::new(10),
            attempted: Direction::Sent,
        })
    );
    assert_eq!(h.flags(w, 10), DirectionFlags::empty());

    h.transfer(11, y, w, 10).unwrap();
    assert!(h.flags(y, 11).contains(Direction::Sent));
}

#[test]
fn test_send_then_receive_blocked() {
    let mut h = Harness::new();
    let (a, b, c) = (addr(1), addr(2), addr(3));

    h.transfer(5, a, b, 1).unwrap();
    assert_matches!(
        h.transfer(5, c, a, 1),
        Err(GuardError::LimitExceeded(LimitExceeded { account, attempted: Direction::Received, .. })) if account == a
    );
}

#[test]
fn test_receiver_rejection_unwinds_sender() {
    let mut h = Harness::new();
    let (fresh, busy, other) = (addr(1), addr(2), addr(3));

    h.transfer(7, busy, other, 1).unwrap();

    // `fresh` would record SENT, then `busy` fails on RECEIVED
    let err = h.transfer(7, fresh, busy, 1).unwrap_err();
    assert_eq!(err.limited_account(), Some(busy));
    assert_eq!(h.flags(fresh, 7), DirectionFlags::empty());

    // Nothing stuck: `fresh` may still receive this epoch
    h.transfer(7, addr(9), fresh, 1).unwrap();
    assert!(h.flags(fresh, 7).contains(Direction::Received));
}

#[test]
fn test_v2_pool_trades_both_ways_in_one_epoch() {
    let pool = addr(0xa1);
    let mut h = Harness::with_chain(|chain| {
        chain.deploy_v2_pair(pool, V2_FACTORY, ASSET_A, ASSET_B);
    });

    for i in 0..5 {
        h.transfer(42, pool, addr(100 + i), 10).unwrap();
        h.transfer(42, addr(200 + i), pool, 10).unwrap();
    }
    assert_eq!(h.flags(pool, 42), DirectionFlags::empty());
}

#[test]
fn test_v3_pool_trades_both_ways_in_one_epoch() {
    let pool = addr(0xa3);
    let mut h = Harness::with_chain(|chain| {
        chain.deploy_v3_pool(pool, V3_FACTORY, ASSET_A, ASSET_B, 500);
    });

    h.transfer(3, pool, addr(1), 10).unwrap();
    h.transfer(3, addr(2), pool, 10).unwrap();
    h.transfer(3, pool, addr(3), 10).unwrap();
    assert_eq!(h.flags(pool, 3), DirectionFlags::empty());
}

#[test]
fn test_sandwich_through_pool_is_blocked() {
    let pool = addr(0xa1);
    let attacker = addr(0x666);
    let mut h = Harness::with_chain(|chain| {
        chain.deploy_v2_pair(pool, V2_FACTORY, TOKEN, ASSET_B);
    });

    // Front-run buy, victim trade, back-run sell
    h.transfer(100, pool, attacker, 1_000).unwrap();
    h.transfer(100, pool, addr(1), 500).unwrap();
    assert_matches!(
        h.transfer(100, attacker, pool, 1_000),
        Err(GuardError::LimitExceeded(e)) if e.account == attacker
    );

    h.transfer(101, attacker, pool, 1_000).unwrap();
}

#[test]
fn test_exempt_sender_still_limits_receiver() {
    let mut h = Harness::new();
    let (treasury, user) = (addr(0xe1), addr(1));
    h.exempt(treasury);

    h.transfer(9, treasury, user, 1).unwrap();
    assert_eq!(h.flags(treasury, 9), DirectionFlags::empty());
    assert!(h.flags(user, 9).contains(Direction::Received));

    assert!(h.transfer(9, user, addr(2), 1).is_err());
    // The exempt side can switch freely
    h.transfer(9, addr(3), treasury, 1).unwrap();
}

#[test]
fn test_noop_boundaries() {
    let mut h = Harness::new();
    let (a, b) = (addr(1), addr(2));

    h.transfer_raw(1, a, b, U256::zero(), false).unwrap();
    h.transfer_raw(1, a, b, U256::MAX, true).unwrap();
    h.transfer_raw(1, a, a, U256::MAX, false).unwrap();
    assert_eq!(h.flags(a, 1), DirectionFlags::empty());
    assert_eq!(h.flags(b, 1), DirectionFlags::empty());

    // A maximal amount is an ordinary transfer
    h.transfer_raw(1, a, b, U256::MAX, false).unwrap();
    assert!(h.flags(a, 1).contains(Direction::Sent));
}

#[test]
fn test_only_protected_token_may_call() {
    let mut h = Harness::new();
    let ctx = guard::CallContext::new(OWNER, Epoch::new(1));

    let err = h
        .guard
        .on_transfer(&ctx, addr(1), addr(2), U256::one(), false)
        .unwrap_err();
    assert_eq!(err, GuardError::UnauthorizedCaller(OWNER));

    // Authorization precedes the skip rules
    let err = h
        .guard
        .on_transfer(&ctx, addr(1), addr(2), U256::zero(), true)
        .unwrap_err();
    assert_eq!(err, GuardError::UnauthorizedCaller(OWNER));
    assert_eq!(h.flags(addr(1), 1), DirectionFlags::empty());
}

#[test]
fn test_pruned_epochs_start_clean() {
    let mut h = Harness::new();
    h.transfer(1, addr(1), addr(2), 1).unwrap();
    h.transfer(2, addr(1), addr(2), 1).unwrap();

    assert_eq!(h.guard.prune_ledger_before(Epoch::new(2)), 2);
    assert_eq!(h.flags(addr(2), 1), DirectionFlags::empty());
    assert!(h.flags(addr(2), 2).contains(Direction::Received));
}

#[traced_test]
#[test]
fn test_rejection_is_logged() {
    let mut h = Harness::new();
    h.transfer(4, addr(1), addr(2), 1).unwrap();
    h.transfer(4, addr(2), addr(3), 1).unwrap_err();

    assert!(logs_contain("direction switch within epoch"));
}
