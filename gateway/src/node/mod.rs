//! Node registry
//!
//! This module contains the per-node session state and the fixed capacity
//! table that owns it:
//! - Hardware addresses
//! - Message rate estimation
//! - Session records and their status
//! - The node registry table

/// Node hardware addresses
pub mod address;

/// Message rate estimator
pub mod rate;

/// Per-node session records
pub mod record;

/// Fixed capacity node table
pub mod registry;

/// Thread-safe registry wrapper
#[cfg(feature = "std")]
pub mod shared;

pub use address::HardwareAddress;
pub use rate::RateFilter;
pub use record::{NodeName, NodeSnapshot, NodeStatus, RecordReport, SessionRecord};
pub use registry::{NodeRegistry, RegistryReport};
#[cfg(feature = "std")]
pub use shared::SharedRegistry;
