//! Registry error types

use thiserror::Error;

/// Reason a node name was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NameError {
    /// Name is empty
    #[error("empty name")]
    Empty,
    /// Name exceeds the maximum label length
    #[error("name too long")]
    TooLong,
    /// Another active node already carries this name
    #[error("name already used by another address")]
    AlreadyUsedByOtherAddress,
}

/// Registry table errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No free slot left for a new node
    #[error("registry is full")]
    OutOfCapacity,
    /// No active node matches the request
    #[error("node not found")]
    NotFound,
    /// Name validation failed
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),
}

/// Per-record errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Key buffer does not have the session key length
    #[error("invalid key length {0}")]
    KeyLength(usize),
    /// Message counter does not advance past the last accepted one
    #[error("replayed counter {received}, last accepted {last}")]
    Replay {
        /// Counter carried by the rejected message
        received: u16,
        /// Last accepted counter
        last: u16,
    },
}
