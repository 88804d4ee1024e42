//! Node registry and session lifecycle for a sensor network gateway
//!
//! This crate tracks every node paired with a gateway: its hardware address,
//! optional name, session key and key age, pairing status, anti-replay
//! counter and a smoothed message rate. All state lives in a fixed table
//! allocated once, so the crate runs without a heap.
//!
//! # Features
//! - Fixed capacity table indexed by dense node ids
//! - Lookup by id, hardware address or name
//! - Idempotent admission and explicit unregistering
//! - Name uniqueness validation among active nodes
//! - Weighted moving average message rate estimation
//! - Optional `defmt` or `tracing` logging
//! - Thread-safe wrapper with the `std` feature
//!
//! # Example
//! ```
//! use gateway::node::{HardwareAddress, NodeRegistry, NodeStatus};
//!
//! let mut registry: NodeRegistry<4> = NodeRegistry::new();
//! let address = HardwareAddress::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
//!
//! // Pairing request received
//! let node = registry.admit(address).unwrap();
//! assert_eq!(node.status, NodeStatus::Init);
//!
//! // Handshake finished
//! node.set_key(&[0xAA; 16]);
//! node.validate_key(1_000);
//! node.set_status(NodeStatus::Registered);
//!
//! // Data message received
//! let node = registry.get_by_address_mut(&address).unwrap();
//! node.accept_counter(1).unwrap();
//! node.record_message(61_000);
//!
//! assert!(registry.unregister(0));
//! assert_eq!(registry.active_count(), 0);
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

/// Limits and session policy
pub mod config;

/// Session key helpers
pub mod crypto;

/// Error types
pub mod error;

/// Node records and registry
pub mod node;

pub use config::{NodeId, SessionPolicy};
pub use error::{NameError, RecordError, RegistryError};
pub use node::{HardwareAddress, NodeRegistry, NodeSnapshot, NodeStatus, SessionRecord};
