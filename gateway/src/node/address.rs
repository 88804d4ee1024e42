//! Node hardware addresses

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::config::ADDRESS_LENGTH;

/// Physical network address of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HardwareAddress([u8; ADDRESS_LENGTH]);

impl HardwareAddress {
    /// All-zero address carried by free slots
    pub const ZERO: Self = Self([0; ADDRESS_LENGTH]);

    /// Create address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create address from a slice, `None` unless it has exactly six bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Check whether every byte is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_LENGTH]
    }
}

impl From<[u8; ADDRESS_LENGTH]> for HardwareAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HardwareAddress {
    fn format(&self, f: defmt::Formatter) {
        let b = &self.0;
        defmt::write!(
            f,
            "{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}",
            b[0],
            b[1],
            b[2],
            b[3],
            b[4],
            b[5]
        )
    }
}

/// Error parsing a textual hardware address
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("invalid hardware address")]
pub struct ParseAddressError;

impl FromStr for HardwareAddress {
    type Err = ParseAddressError;

    /// Parse `AA:BB:CC:DD:EE:FF` or `AA-BB-CC-DD-EE-FF`, case insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = if s.contains('-') { '-' } else { ':' };
        let mut bytes = [0u8; ADDRESS_LENGTH];
        let mut parts = s.split(separator);

        for byte in bytes.iter_mut() {
            let part = parts.next().ok_or(ParseAddressError)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ParseAddressError);
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| ParseAddressError)?;
        }

        if parts.next().is_some() {
            return Err(ParseAddressError);
        }

        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_display() {
        let addr = HardwareAddress::new([0x01, 0x02, 0x03, 0xAB, 0xCD, 0xEF]);
        assert_eq!(addr.to_string(), "01:02:03:AB:CD:EF");
    }

    #[test]
    fn test_parse() {
        let addr: HardwareAddress = "01:02:03:ab:cd:ef".parse().unwrap();
        assert_eq!(addr.as_bytes(), &[0x01, 0x02, 0x03, 0xAB, 0xCD, 0xEF]);

        let dashed: HardwareAddress = "01-02-03-AB-CD-EF".parse().unwrap();
        assert_eq!(dashed, addr);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<HardwareAddress>().is_err());
        assert!("01:02:03:04:05".parse::<HardwareAddress>().is_err());
        assert!("01:02:03:04:05:06:07".parse::<HardwareAddress>().is_err());
        assert!("01:02:03:04:05:G6".parse::<HardwareAddress>().is_err());
        assert!("1:02:03:04:05:06".parse::<HardwareAddress>().is_err());
        assert!("sensor1".parse::<HardwareAddress>().is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "nope".parse::<HardwareAddress>().unwrap_err();
        assert_eq!(err.to_string(), "invalid hardware address");
    }

    #[test]
    fn test_from_slice() {
        assert!(HardwareAddress::from_slice(&[1, 2, 3]).is_none());
        let addr = HardwareAddress::from_slice(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(!addr.is_zero());
        assert!(HardwareAddress::ZERO.is_zero());
    }
}
