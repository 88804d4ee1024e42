//! Thread-safe registry wrapper
//!
//! The radio receive path, housekeeping and management code may run on
//! different threads on a hosted gateway. [`SharedRegistry`] serializes them
//! behind one lock held for each whole logical operation, so a scan such as
//! name validation never observes a half-finished admission.

use heapless::Vec;
use parking_lot::Mutex;

use super::address::HardwareAddress;
use super::record::NodeSnapshot;
use super::registry::NodeRegistry;
use crate::config::{NodeId, DEFAULT_CAPACITY};
use crate::error::RegistryError;

/// Registry behind a single mutex
#[derive(Debug, Default)]
pub struct SharedRegistry<const N: usize = DEFAULT_CAPACITY> {
    inner: Mutex<NodeRegistry<N>>,
}

impl<const N: usize> SharedRegistry<N> {
    /// Create a shared registry with all slots free
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(NodeRegistry::new()),
        }
    }

    /// Run `f` with shared access to the registry
    pub fn with<T>(&self, f: impl FnOnce(&NodeRegistry<N>) -> T) -> T {
        f(&self.inner.lock())
    }

    /// Run `f` with exclusive access to the registry
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut NodeRegistry<N>) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Admit `address` and return the snapshot of its record
    pub fn admit(&self, address: HardwareAddress) -> Result<NodeSnapshot, RegistryError> {
        self.with_mut(|registry| registry.admit(address).map(|record| record.snapshot()))
    }

    /// Release slot `id`
    pub fn unregister(&self, id: NodeId) -> bool {
        self.with_mut(|registry| registry.unregister(id))
    }

    /// Validate and assign a name in one critical section
    pub fn set_name(&self, id: NodeId, name: &str) -> Result<(), RegistryError> {
        self.with_mut(|registry| registry.set_name(id, name))
    }

    /// Snapshot of the active record bound to `address`
    pub fn snapshot_by_address(&self, address: &HardwareAddress) -> Option<NodeSnapshot> {
        self.with(|registry| registry.get_by_address(address).map(|record| record.snapshot()))
    }

    /// Number of active records
    pub fn active_count(&self) -> usize {
        self.with(NodeRegistry::active_count)
    }

    /// Snapshots of all active records in ascending id order
    pub fn snapshots(&self) -> Vec<NodeSnapshot, N> {
        self.with(|registry| {
            let mut snapshots = Vec::new();
            for record in registry.iter_active() {
                // At most N records are active
                let _ = snapshots.push(record.snapshot());
            }
            snapshots
        })
    }
}
