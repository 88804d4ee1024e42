#![cfg(feature = "std")]

use std::sync::Arc;
use std::thread;

use gateway::{
    node::{HardwareAddress, NodeStatus, SharedRegistry},
    NameError, RegistryError,
};

#[test]
fn test_concurrent_admission_is_unique() {
    let registry: Arc<SharedRegistry<16>> = Arc::new(SharedRegistry::new());

    let handles: Vec<_> = (0..4u8)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for last in 0..8u8 {
                    // Workers overlap on half of the addresses
                    let address = HardwareAddress::new([0, 0, 0, 0, worker % 2, last]);
                    registry.admit(address).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.active_count(), 16);
    let snapshots = registry.snapshots();
    let ids: Vec<u16> = snapshots.iter().map(|s| s.id).collect();
    assert_eq!(ids, (0..16).collect::<Vec<u16>>());
}

#[test]
fn test_capacity_through_wrapper() {
    let registry: SharedRegistry<1> = SharedRegistry::new();
    registry.admit(HardwareAddress::new([1; 6])).unwrap();
    assert_eq!(
        registry.admit(HardwareAddress::new([2; 6])).map(|s| s.id),
        Err(RegistryError::OutOfCapacity)
    );
    assert!(registry.unregister(0));
    assert_eq!(registry.admit(HardwareAddress::new([2; 6])).unwrap().id, 0);
}

#[test]
fn test_name_claim_is_atomic() {
    let registry: SharedRegistry<2> = SharedRegistry::new();
    let a = registry.admit(HardwareAddress::new([1; 6])).unwrap().id;
    let b = registry.admit(HardwareAddress::new([2; 6])).unwrap().id;

    registry.set_name(a, "sensor1").unwrap();
    assert_eq!(
        registry.set_name(b, "sensor1"),
        Err(RegistryError::InvalidName(NameError::AlreadyUsedByOtherAddress))
    );

    registry.with_mut(|r| r.get_by_id_mut(a).unwrap().set_status(NodeStatus::Registered));
    let snapshot = registry
        .snapshot_by_address(&HardwareAddress::new([1; 6]))
        .unwrap();
    assert_eq!(snapshot.status, NodeStatus::Registered);
    assert_eq!(snapshot.name.as_str(), "sensor1");
}
