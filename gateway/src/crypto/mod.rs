//! Session key helpers
//!
//! The registry tracks session keys, it never derives them. This module only
//! provides what reporting needs:
//! - Key check value (KCV) so status dumps can identify a key without
//!   printing it

use aes::Aes128;
use cmac::{Cmac, Mac};

use crate::config::SessionKey;

/// Key check value size in bytes
pub const KCV_SIZE: usize = 3;

/// Compute the AES-CMAC key check value of a session key
///
/// The KCV is the leftmost [`KCV_SIZE`] bytes of the CMAC of an empty
/// message under `key`.
pub fn key_check_value(key: &SessionKey) -> [u8; KCV_SIZE] {
    let mut kcv = [0u8; KCV_SIZE];
    // Key length is fixed by the type, so construction cannot fail
    if let Ok(mac) = <Cmac<Aes128> as Mac>::new_from_slice(key) {
        let tag = mac.finalize().into_bytes();
        kcv.copy_from_slice(&tag[..KCV_SIZE]);
    }
    kcv
}
