//! Fixed capacity node table
//!
//! The registry owns exactly `N` session records, preallocated at
//! construction. A node id is the index of its slot. Admission claims the
//! first free slot and unregistering releases it; nothing is ever allocated
//! or freed.
//!
//! Every lookup apart from [`NodeRegistry::get_by_id`] is a linear scan.
//! Tables hold tens of nodes and lookups are rare next to message traffic,
//! so no secondary index is kept.

use core::fmt;

use super::address::HardwareAddress;
use super::record::{NodeStatus, SessionRecord};
use crate::config::{NodeId, SessionPolicy, DEFAULT_CAPACITY, NAME_LENGTH};
use crate::error::{NameError, RegistryError};

/// Table of node session records
#[derive(Debug, Clone)]
pub struct NodeRegistry<const N: usize = DEFAULT_CAPACITY> {
    slots: [SessionRecord; N],
}

/// Every slot index must be representable as a [`NodeId`]
const fn slots_fit(n: usize) -> bool {
    n <= NodeId::MAX as usize + 1
}

impl<const N: usize> NodeRegistry<N> {
    const SLOTS_FIT: () = assert!(slots_fit(N), "registry capacity exceeds the NodeId range");

    /// Create registry with all slots free
    pub fn new() -> Self {
        let () = Self::SLOTS_FIT;
        Self {
            slots: core::array::from_fn(|i| SessionRecord::new(i as NodeId)),
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        N
    }

    /// Get record by id, free or not
    pub fn get_by_id(&self, id: NodeId) -> Option<&SessionRecord> {
        self.slots.get(usize::from(id))
    }

    /// Get mutable record by id, free or not
    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut SessionRecord> {
        self.slots.get_mut(usize::from(id))
    }

    /// Find the active record bound to `address`
    pub fn get_by_address(&self, address: &HardwareAddress) -> Option<&SessionRecord> {
        self.slots
            .iter()
            .find(|record| record.is_active() && record.address() == address)
    }

    /// Find the active record bound to `address`, mutably
    pub fn get_by_address_mut(&mut self, address: &HardwareAddress) -> Option<&mut SessionRecord> {
        self.slots
            .iter_mut()
            .find(|record| record.is_active() && record.address() == address)
    }

    /// Find the active record carrying `name`
    ///
    /// An empty name never matches.
    pub fn get_by_name(&self, name: &str) -> Option<&SessionRecord> {
        if name.is_empty() {
            return None;
        }
        self.slots
            .iter()
            .find(|record| record.is_active() && record.name() == name)
    }

    /// Find the active record carrying `name`, mutably
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut SessionRecord> {
        if name.is_empty() {
            return None;
        }
        self.slots
            .iter_mut()
            .find(|record| record.is_active() && record.name() == name)
    }

    /// Resolve a downlink target given as hardware address text or node name
    ///
    /// Address text is tried first. When no active node has that address the
    /// target is looked up as a name, so a node named like an address stays
    /// reachable.
    pub fn find(&self, target: &str) -> Option<&SessionRecord> {
        match self.position_by_text(target) {
            Some(index) => self.slots.get(index),
            None => self.get_by_name(target),
        }
    }

    /// Resolve a downlink target given as hardware address text or node name, mutably
    pub fn find_mut(&mut self, target: &str) -> Option<&mut SessionRecord> {
        match self.position_by_text(target) {
            Some(index) => self.slots.get_mut(index),
            None => self.get_by_name_mut(target),
        }
    }

    /// Check whether the node at `address` may use `name`
    ///
    /// A name held by another active node is refused. The node already
    /// holding the name may keep it.
    pub fn validate_name(&self, name: &str, address: &HardwareAddress) -> Result<(), NameError> {
        if name.is_empty() {
            warn!("Empty name");
            return Err(NameError::Empty);
        }
        if name.len() > NAME_LENGTH {
            warn!("Name too long {}", name);
            return Err(NameError::TooLong);
        }

        for record in self.slots.iter().filter(|record| record.is_active()) {
            if record.name() == name {
                debug!("Found node name {} with address {}", name, record.address());
                if record.address() != address {
                    warn!("Duplicated name {}", name);
                    return Err(NameError::AlreadyUsedByOtherAddress);
                }
            }
        }

        Ok(())
    }

    /// Validate and assign a name to active node `id`
    ///
    /// This is the only way to name a node; records cannot be renamed
    /// directly.
    ///
    /// ```compile_fail
    /// let mut record = gateway::SessionRecord::new(0);
    /// record.set_name("sensor1");
    /// ```
    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<(), RegistryError> {
        let address = match self.get_by_id(id) {
            Some(record) if record.is_active() => *record.address(),
            _ => return Err(RegistryError::NotFound),
        };
        self.validate_name(name, &address)?;

        let record = self.get_by_id_mut(id).ok_or(RegistryError::NotFound)?;
        record.set_name(name)?;
        info!("Node {} named {}", id, name);
        Ok(())
    }

    /// Get the record for `address`, binding a free slot if needed
    ///
    /// Admitting an address that is already active returns its existing
    /// record. A newly bound record starts in [`NodeStatus::Init`].
    pub fn admit(&mut self, address: HardwareAddress) -> Result<&mut SessionRecord, RegistryError> {
        let index = match self.position_by_address(&address) {
            Some(index) => index,
            None => {
                let index = match self.slots.iter().position(|record| !record.is_active()) {
                    Some(index) => index,
                    None => {
                        warn!("No free slot for {}", address);
                        return Err(RegistryError::OutOfCapacity);
                    }
                };
                let record = &mut self.slots[index];
                record.reset();
                record.set_address(address);
                record.set_status(NodeStatus::Init);
                info!("Node {} admitted with address {}", record.id(), address);
                index
            }
        };
        Ok(&mut self.slots[index])
    }

    /// Release slot `id`, returning whether it was active
    pub fn unregister(&mut self, id: NodeId) -> bool {
        self.get_by_id_mut(id)
            .map(SessionRecord::release)
            .unwrap_or(false)
    }

    /// Release the slot bound to `address`, returning whether one was found
    pub fn unregister_address(&mut self, address: &HardwareAddress) -> bool {
        self.get_by_address_mut(address)
            .map(SessionRecord::release)
            .unwrap_or(false)
    }

    /// Number of active records
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|record| record.is_active()).count()
    }

    /// Iterate active records in ascending id order
    pub fn iter_active(&self) -> impl Iterator<Item = &SessionRecord> + '_ {
        self.slots.iter().filter(|record| record.is_active())
    }

    /// Iterate active records mutably in ascending id order
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut SessionRecord> + '_ {
        self.slots.iter_mut().filter(|record| record.is_active())
    }

    /// First active record
    pub fn first_active(&self) -> Option<&SessionRecord> {
        self.iter_active().next()
    }

    /// First active record with an id greater than `id`
    pub fn next_active_after(&self, id: NodeId) -> Option<&SessionRecord> {
        let start = usize::from(id).saturating_add(1);
        self.slots
            .get(start..)?
            .iter()
            .find(|record| record.is_active())
    }

    /// Ids of active records whose valid key outlived `policy`
    pub fn expired(
        &self,
        now_ms: u32,
        policy: SessionPolicy,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.iter_active()
            .filter(move |record| record.key_expired(now_ms, &policy))
            .map(SessionRecord::id)
    }

    /// Unregister every record whose key outlived `policy`
    ///
    /// Only runs when called; the registry has no timers of its own.
    pub fn unregister_expired(&mut self, now_ms: u32, policy: SessionPolicy) -> usize {
        let mut count = 0;
        for record in self.iter_active_mut() {
            if record.key_expired(now_ms, &policy) {
                debug!("Node {} key expired", record.id());
                record.release();
                count += 1;
            }
        }
        count
    }

    /// Status dump of all active records relative to `now_ms`
    pub fn report(&self, now_ms: u32) -> RegistryReport<'_, N> {
        RegistryReport {
            registry: self,
            now_ms,
        }
    }

    fn position_by_address(&self, address: &HardwareAddress) -> Option<usize> {
        self.slots
            .iter()
            .position(|record| record.is_active() && record.address() == address)
    }

    fn position_by_text(&self, text: &str) -> Option<usize> {
        let address = text.parse::<HardwareAddress>().ok()?;
        self.position_by_address(&address)
    }
}

impl<const N: usize> Default for NodeRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Status dump of a registry, see [`NodeRegistry::report`]
pub struct RegistryReport<'a, const N: usize> {
    registry: &'a NodeRegistry<N>,
    now_ms: u32,
}

impl<const N: usize> fmt::Display for RegistryReport<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} nodes active",
            self.registry.active_count(),
            self.registry.capacity()
        )?;
        for record in self.registry.iter_active() {
            writeln!(f)?;
            write!(f, "{}", record.report(self.now_ms))?;
        }
        Ok(())
    }
}
