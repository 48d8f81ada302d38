//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and list/render
//! limits live here so they can be tuned in one place.

// BLE

/// Duration of one scan window before the scanner restarts (seconds).
///
/// The SoftDevice keeps scanning across windows; restarting lets the
/// scanner task notice a stop request and keeps the duplicate filter fresh.
pub const BLE_SCAN_WINDOW_SECS: u64 = 10;

/// Number of device records the firmware registry can hold.
pub const REGISTRY_CAPACITY: usize = 16;

/// Maximum stored device name length in bytes (longer names are truncated).
pub const NAME_CAPACITY: usize = 32;

// Rendering

/// Display refresh / auto-scroll tick period (ms).
pub const RENDER_TICK_MS: u64 = 1000;

/// Default number of ticks between auto-scroll advances.
pub const DEFAULT_SCROLL_INTERVAL_TICKS: u32 = 2;

/// Capacity of one formatted list row, in bytes.
///
/// `32` name bytes + `" (-127 dBm)"` fits with room to spare.
pub const LINE_CAPACITY: usize = 48;

/// Maximum length of the optional title row.
pub const TITLE_CAPACITY: usize = 32;

/// Text drawn when the registry is empty.
pub const EMPTY_PLACEHOLDER: &str = "No devices found";

/// Title shown above the list on the OLED.
pub const DEFAULT_TITLE: &str = "BLE Devices";

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button SELECT  → P0.24
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

// Configuration validation

/// Maximum number of field errors reported by one validation pass.
pub const MAX_CONFIG_ERRORS: usize = 8;
