//! Owner-gated writes, change notifications and config bootstrap

use guard::{FactoryRecord, GuardError, GuardEvent, InMemoryChain, TransferGuard};
use guard_config::{bootstrap_registries, GuardSettings};
use guard_e2e_tests::{addr, Harness, OWNER, TOKEN, V2_FACTORY};
use std::fs;
use tempfile::tempdir;
use types::{Address, ProtocolVersion};

#[test]
fn test_construction_rejects_zero_token() {
    let result = TransferGuard::new(
        Address::zero(),
        OWNER,
        InMemoryChain::new(),
        Default::default(),
    );
    assert!(matches!(result, Err(GuardError::InvalidAddress)));
}

#[test]
fn test_exemption_writes_emit_notifications() {
    let mut h = Harness::new();
    h.guard.set_exemption(OWNER, addr(1), true).unwrap();
    h.guard.set_exemption(OWNER, addr(1), false).unwrap();

    assert_eq!(
        h.events(),
        vec![
            GuardEvent::ExemptionUpdated {
                account: addr(1),
                is_exempt: true
            },
            GuardEvent::ExemptionUpdated {
                account: addr(1),
                is_exempt: false
            },
        ]
    );
    assert!(!h.guard.is_exempt(addr(1)));
}

#[test]
fn test_non_owner_writes_are_rejected() {
    let mut h = Harness::new();
    let intruder = addr(0x666);

    assert_eq!(
        h.guard.set_exemption(intruder, intruder, true),
        Err(GuardError::NotOwner(intruder))
    );
    assert_eq!(
        h.guard.set_factory_whitelist(TOKEN, addr(0xf9), 2, true),
        Err(GuardError::NotOwner(TOKEN))
    );
    assert!(h.events().is_empty());
}

#[test]
fn test_batch_is_all_or_nothing() {
    let mut h = Harness::new();

    assert_eq!(
        h.guard
            .set_exemption_batch(OWNER, &[addr(1), addr(2)], &[true]),
        Err(GuardError::ArrayLengthMismatch {
            accounts: 2,
            flags: 1
        })
    );
    assert_eq!(
        h.guard
            .set_exemption_batch(OWNER, &[addr(1), Address::zero()], &[true, true]),
        Err(GuardError::InvalidAddress)
    );
    assert!(!h.guard.is_exempt(addr(1)));
    assert!(h.events().is_empty());

    h.guard
        .set_exemption_batch(OWNER, &[addr(1), addr(2)], &[true, false])
        .unwrap();
    assert!(h.guard.is_exempt(addr(1)));
    assert!(!h.guard.is_exempt(addr(2)));
    assert_eq!(h.events().len(), 2);
}

#[test]
fn test_factory_version_validation() {
    let mut h = Harness::new();

    assert_eq!(
        h.guard.set_factory_whitelist(OWNER, addr(0xf9), 4, true),
        Err(GuardError::InvalidFactoryVersion(4))
    );
    assert_eq!(
        h.guard.set_factory_whitelist(OWNER, Address::zero(), 2, true),
        Err(GuardError::InvalidAddress)
    );

    // Re-registering overwrites the version
    h.guard.set_factory_whitelist(OWNER, V2_FACTORY, 3, true).unwrap();
    assert_eq!(
        h.guard.factory_record(V2_FACTORY),
        Some(FactoryRecord {
            whitelisted: true,
            version: ProtocolVersion::V3
        })
    );
    assert_eq!(
        h.events(),
        vec![GuardEvent::FactoryWhitelistUpdated {
            factory: V2_FACTORY,
            version: ProtocolVersion::V3,
            whitelisted: true
        }]
    );
}

#[test]
fn test_ownership_handover() {
    let mut h = Harness::new();
    let successor = addr(0x5);

    h.guard.transfer_ownership(OWNER, successor).unwrap();
    assert_eq!(h.guard.owner(), successor);
    assert_eq!(
        h.guard.set_exemption(OWNER, addr(1), true),
        Err(GuardError::NotOwner(OWNER))
    );
    h.guard.set_exemption(successor, addr(1), true).unwrap();

    let events = h.events();
    assert_eq!(
        events[0],
        GuardEvent::OwnershipTransferred {
            previous_owner: OWNER,
            new_owner: successor
        }
    );
}

#[test]
fn test_bootstrap_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("guard.toml");
    fs::write(
        &path,
        r#"
exemptions = ["0x00000000000000000000000000000000000000e1"]

[guard]
protected_token = "0x00000000000000000000000000000000000000aa"
owner = "0x00000000000000000000000000000000000000bb"

[[factories]]
address = "0x00000000000000000000000000000000000000f2"
version = 2
"#,
    )
    .unwrap();

    let settings = GuardSettings::load(Some(&path), None).unwrap();
    let mut guard = TransferGuard::new(
        settings.guard.protected_token,
        settings.guard.owner,
        InMemoryChain::new(),
        settings.oracle,
    )
    .unwrap();
    bootstrap_registries(&settings, &mut guard).unwrap();

    assert_eq!(guard.protected_token(), TOKEN);
    assert!(guard.is_exempt(addr(0xe1)));
    assert_eq!(
        guard.factories().whitelisted_version(V2_FACTORY),
        Some(ProtocolVersion::V2)
    );
    assert_eq!(guard.events().len(), 2);
}

#[test]
fn test_bootstrap_rejects_unknown_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("guard.toml");
    fs::write(
        &path,
        r#"
[guard]
protected_token = "0x00000000000000000000000000000000000000aa"
owner = "0x00000000000000000000000000000000000000bb"

[[factories]]
address = "0x00000000000000000000000000000000000000f2"
version = 7
"#,
    )
    .unwrap();

    let settings = GuardSettings::load(Some(&path), None).unwrap();
    let mut guard =
        TransferGuard::new(TOKEN, OWNER, InMemoryChain::new(), settings.oracle).unwrap();
    assert!(bootstrap_registries(&settings, &mut guard).is_err());
}
