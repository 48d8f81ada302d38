//! blelist - BLE scan-result list display.
//!
//! Keeps a bounded, recency-ordered list of nearby BLE devices and renders
//! it onto a small display, one row per device, auto-scrolling when the
//! list is longer than the screen.
//!
//! Everything except the firmware glue (`embedded` feature) is `no_std`,
//! allocation-free and runs on the host:
//!
//! Usage: `cargo test --lib` (unit tests) or `cargo test` (plus
//! `tests/integration.rs`).
//!
//! The embedded binary uses main.rs with #![no_std] and #![no_main].

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod component;
pub mod config;
pub mod error;
pub mod schema;
pub mod ui;

pub use ble::registry::{DeviceRecord, DeviceRegistry, RegistryStats, Snapshot};
pub use ble::{DeviceAddress, ScanFilter};
pub use component::BleListDisplay;
pub use error::Error;
pub use schema::{validate, ComponentConfig, Resource, ResourceKind, ValidatedConfig};
pub use ui::render::{ListRenderer, RenderState};
pub use ui::surface::{DisplaySurface, Font, SurfaceError};
pub use ui::ButtonEvent;
