//! Bluetooth Low Energy subsystem.
//!
//! 1. **Advertisement parser** - walks raw AD structures, pulls out the
//!    local name and 16-bit service UUIDs, rejects malformed payloads.
//! 2. **Registry** - bounded, recency-ordered set of discovered devices
//!    shared between the scan callback and the display task.
//! 3. **Scanner** (embedded only) - drives the Nordic SoftDevice S140 in
//!    Central role and feeds every advertisement into the registry.

pub mod adv_parser;
pub mod registry;
#[cfg(feature = "embedded")]
pub mod scanner;

use core::fmt;

use adv_parser::AdvFields;

/// 48-bit BLE device address.
///
/// Bytes are stored most-significant first, i.e. in the order they are
/// printed (`AA:BB:CC:DD:EE:FF`).  Ordering is byte-wise ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(pub [u8; 6]);

impl DeviceAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Build from the little-endian byte order used on air and by the
    /// SoftDevice (`ble_gap_addr_t::addr`).
    pub fn from_le_bytes(mut bytes: [u8; 6]) -> Self {
        bytes.reverse();
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// Admission rule applied to parsed advertisements before they reach
/// the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanFilter {
    /// Drop advertisements weaker than this (dBm).
    pub min_rssi: Option<i8>,
    /// Only admit devices listing this 16-bit service UUID.
    pub service_uuid16: Option<u16>,
}

impl ScanFilter {
    /// Filter that admits every well-formed advertisement.
    pub const ALLOW_ALL: Self = Self {
        min_rssi: None,
        service_uuid16: None,
    };

    pub fn admits(&self, rssi: i8, fields: &AdvFields<'_>) -> bool {
        if let Some(min) = self.min_rssi {
            if rssi < min {
                return false;
            }
        }
        match self.service_uuid16 {
            Some(uuid) => fields.has_service_uuid16(uuid),
            None => true,
        }
    }
}
