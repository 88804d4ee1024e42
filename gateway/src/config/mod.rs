//! Registry configuration
//!
//! This module contains the compile-time limits shared by every part of the
//! registry and the session policy consumed by gateway housekeeping:
//! - Address, key and name lengths
//! - Rate estimator order
//! - Default table capacity
//! - Key lifetime used for caller-driven expiry

/// Hardware address length in bytes
pub const ADDRESS_LENGTH: usize = 6;
/// Session key length in bytes (AES-128)
pub const KEY_LENGTH: usize = 16;
/// Maximum node name length in bytes
pub const NAME_LENGTH: usize = 32;
/// Number of samples averaged by the rate estimator
pub const RATE_FILTER_ORDER: usize = 5;
/// Default number of slots in a registry
pub const DEFAULT_CAPACITY: usize = 20;

/// Dense node identifier, equal to the slot index
pub type NodeId = u16;
/// Session key bytes
pub type SessionKey = [u8; KEY_LENGTH];

/// Milliseconds per hour, used to turn inter-arrival times into rates
pub const MILLIS_PER_HOUR: f32 = 3_600_000.0;

/// Session policy applied by gateway housekeeping
///
/// The registry never expires sessions on its own. Housekeeping code passes a
/// policy to [`NodeRegistry::unregister_expired`](crate::node::NodeRegistry::unregister_expired)
/// when it decides to sweep aged keys.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionPolicy {
    /// Maximum age of a session key in milliseconds
    pub key_lifetime_ms: u32,
}

impl SessionPolicy {
    /// Create a policy with the given key lifetime
    pub const fn new(key_lifetime_ms: u32) -> Self {
        Self { key_lifetime_ms }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        // One day
        Self::new(86_400_000)
    }
}
