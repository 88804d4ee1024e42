//! Per-node session records
//!
//! A [`SessionRecord`] holds everything the gateway knows about one paired
//! node: its identity, the current session key, the pairing status, the
//! anti-replay counter and a smoothed message rate.
//!
//! Status transitions are driven by the handshake layer. The record stores
//! whatever status it is given and never validates the transition.

use core::fmt;

use heapless::String;
use zeroize::Zeroize;

use super::address::HardwareAddress;
use super::rate::RateFilter;
use crate::config::{NodeId, SessionKey, SessionPolicy, KEY_LENGTH, MILLIS_PER_HOUR, NAME_LENGTH};
use crate::crypto::key_check_value;
use crate::error::{NameError, RecordError};

/// Node name storage
pub type NodeName = String<NAME_LENGTH>;

/// Node pairing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeStatus {
    /// Free slot, no node bound
    #[default]
    Unregistered,
    /// Address known, handshake not started
    Init,
    /// Pairing request received, waiting for server hello delivery
    WaitForServerHello,
    /// Key established, waiting for the node to confirm
    WaitForDownlink,
    /// Key valid, node operating normally
    Registered,
    /// Node is in a low power interval
    Sleep,
}

impl NodeStatus {
    /// Check if the slot is bound to a node
    pub fn is_active(&self) -> bool {
        *self != NodeStatus::Unregistered
    }

    /// Check if ordinary data messages may be accepted
    pub fn accepts_data(&self) -> bool {
        *self == NodeStatus::Registered
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeStatus::Unregistered => "Unregistered",
            NodeStatus::Init => "Initializing",
            NodeStatus::WaitForServerHello => "Wait for server hello",
            NodeStatus::WaitForDownlink => "Wait for downlink",
            NodeStatus::Registered => "Registered. Wait for messages",
            NodeStatus::Sleep => "Going to sleep",
        })
    }
}

/// Plain value copy of a record
///
/// Handed to display, downlink and management code. Changing a snapshot
/// never affects the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    /// Node identifier
    pub id: NodeId,
    /// Hardware address
    pub address: HardwareAddress,
    /// Node name, empty if unset
    pub name: NodeName,
    /// Session key
    pub key: SessionKey,
    /// Whether `key` holds usable key material
    pub key_valid: bool,
    /// Time the key became valid (ms)
    pub key_valid_from: u32,
    /// Last accepted message counter
    pub last_message_counter: u16,
    /// Pairing status
    pub status: NodeStatus,
    /// Smoothed message rate (messages per hour)
    pub packets_per_hour: f32,
}

/// Session state of one node
#[derive(Debug, Clone)]
pub struct SessionRecord {
    id: NodeId,
    address: HardwareAddress,
    name: NodeName,
    key: SessionKey,
    /// Whether `key` holds usable key material
    pub key_valid: bool,
    /// Time the current key became valid (ms, monotonic)
    pub key_valid_from: u32,
    /// Last accepted anti-replay counter
    pub last_message_counter: u16,
    /// Pairing status, written by the handshake layer
    pub status: NodeStatus,
    last_message_time: Option<u32>,
    rate: RateFilter,
}

impl SessionRecord {
    /// Create an empty record for slot `id`
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            address: HardwareAddress::ZERO,
            name: String::new(),
            key: [0; KEY_LENGTH],
            key_valid: false,
            key_valid_from: 0,
            last_message_counter: 0,
            status: NodeStatus::Unregistered,
            last_message_time: None,
            rate: RateFilter::new(),
        }
    }

    /// Rebuild a record from its value form
    ///
    /// The rate history is not part of a snapshot, so the estimator starts
    /// empty.
    pub fn from_snapshot(snapshot: NodeSnapshot) -> Self {
        let mut record = Self::new(snapshot.id);
        record.address = snapshot.address;
        record.name = snapshot.name;
        record.key = snapshot.key;
        record.key_valid = snapshot.key_valid;
        record.key_valid_from = snapshot.key_valid_from;
        record.last_message_counter = snapshot.last_message_counter;
        record.status = snapshot.status;
        record
    }

    /// Node identifier
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Hardware address
    pub fn address(&self) -> &HardwareAddress {
        &self.address
    }

    pub(crate) fn set_address(&mut self, address: HardwareAddress) {
        self.address = address;
    }

    /// Node name, empty if unset
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether the slot is bound to a node
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Set the status
    pub fn set_status(&mut self, status: NodeStatus) {
        self.status = status;
    }

    /// Store the name without checking uniqueness
    ///
    /// Only the registry calls this, after checking the name against other
    /// active nodes. See [`NodeRegistry::set_name`](super::NodeRegistry::set_name).
    pub(crate) fn set_name(&mut self, name: &str) -> Result<(), NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        let mut stored = NodeName::new();
        stored.push_str(name).map_err(|_| NameError::TooLong)?;
        self.name = stored;
        Ok(())
    }

    /// Session key bytes
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Copy a session key into the record
    ///
    /// Silently ignored unless `key` is exactly [`KEY_LENGTH`] bytes long.
    /// Validity flags are left untouched.
    pub fn set_key(&mut self, key: &[u8]) {
        if key.len() == KEY_LENGTH {
            self.key.copy_from_slice(key);
        }
    }

    /// Copy a session key into the record, reporting a bad length
    pub fn try_set_key(&mut self, key: &[u8]) -> Result<(), RecordError> {
        if key.len() != KEY_LENGTH {
            return Err(RecordError::KeyLength(key.len()));
        }
        self.key.copy_from_slice(key);
        Ok(())
    }

    /// Mark the stored key valid from `now_ms`
    pub fn validate_key(&mut self, now_ms: u32) {
        self.key_valid = true;
        self.key_valid_from = now_ms;
    }

    /// Milliseconds since the key became valid
    pub fn key_age_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.key_valid_from)
    }

    /// Check if a valid key has outlived the policy
    pub fn key_expired(&self, now_ms: u32, policy: &SessionPolicy) -> bool {
        self.key_valid && self.key_age_ms(now_ms) > policy.key_lifetime_ms
    }

    /// Check if `counter` is newer than the last accepted one
    pub fn is_fresh_counter(&self, counter: u16) -> bool {
        counter > self.last_message_counter
    }

    /// Accept `counter` if it is fresh, rejecting replays
    pub fn accept_counter(&mut self, counter: u16) -> Result<(), RecordError> {
        if !self.is_fresh_counter(counter) {
            warn!(
                "Node {} replayed counter {} (last {})",
                self.id,
                counter,
                self.last_message_counter
            );
            return Err(RecordError::Replay {
                received: counter,
                last: self.last_message_counter,
            });
        }
        self.last_message_counter = counter;
        Ok(())
    }

    /// Feed a messages-per-hour sample and return the smoothed rate
    pub fn update_rate(&mut self, sample: f32) -> f32 {
        self.rate.add(sample)
    }

    /// Record a message arrival at `now_ms` and return the smoothed rate
    ///
    /// The sample is derived from the time since the previous message. The
    /// first message after reset only stamps the time.
    pub fn record_message(&mut self, now_ms: u32) -> f32 {
        let previous = match self.last_message_time.replace(now_ms) {
            Some(previous) => previous,
            None => return self.rate.value(),
        };

        let elapsed = now_ms.wrapping_sub(previous);
        if elapsed == 0 {
            return self.rate.value();
        }

        self.update_rate(MILLIS_PER_HOUR / elapsed as f32)
    }

    /// Smoothed message rate (messages per hour)
    pub fn packets_per_hour(&self) -> f32 {
        self.rate.value()
    }

    /// Time of the last recorded message (ms), `None` before the first one
    pub fn last_message_time(&self) -> Option<u32> {
        self.last_message_time
    }

    /// Take a value copy of the record
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            address: self.address,
            name: self.name.clone(),
            key: self.key,
            key_valid: self.key_valid,
            key_valid_from: self.key_valid_from,
            last_message_counter: self.last_message_counter,
            status: self.status,
            packets_per_hour: self.rate.value(),
        }
    }

    /// Return the slot to its empty state
    pub fn reset(&mut self) {
        trace!("Reset node {}", self.id);
        self.key.zeroize();
        self.address = HardwareAddress::ZERO;
        self.name.clear();
        self.key_valid = false;
        self.key_valid_from = 0;
        self.last_message_counter = 0;
        self.last_message_time = None;
        self.status = NodeStatus::Unregistered;
        self.rate.clear();
    }

    /// Reset the record, returning whether it was bound to a node
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        self.reset();
        if was_active {
            info!("Node {} unregistered", self.id);
        }
        was_active
    }

    /// Human readable status dump relative to `now_ms`
    pub fn report(&self, now_ms: u32) -> RecordReport<'_> {
        RecordReport {
            record: self,
            now_ms,
        }
    }
}

/// Status dump of one record, see [`SessionRecord::report`]
pub struct RecordReport<'a> {
    record: &'a SessionRecord,
    now_ms: u32,
}

impl fmt::Display for RecordReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record;
        writeln!(f, "Node: {}", r.id)?;
        writeln!(f, "\tMAC Address: {}", r.address)?;
        if !r.name.is_empty() {
            writeln!(f, "\tName: {}", r.name)?;
        }
        writeln!(f, "\tLast counter: {}", r.last_message_counter)?;
        writeln!(f, "\tKey valid from: {} ms ago", r.key_age_ms(self.now_ms))?;
        if r.key_valid {
            let kcv = key_check_value(&r.key);
            writeln!(f, "\tKey: Valid (KCV {:02X}{:02X}{:02X})", kcv[0], kcv[1], kcv[2])?;
        } else {
            writeln!(f, "\tKey: Invalid")?;
        }
        writeln!(f, "\tStatus: {}", r.status)?;
        writeln!(f, "\tRate: {:.2} msg/h", r.packets_per_hour())
    }
}
