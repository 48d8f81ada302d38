//! User interface subsystem - device list on the OLED + physical buttons.
//!
//! ## Components
//!
//! - **Surface**: `Font` / `DisplaySurface` capabilities the renderer uses
//! - **Render**: device-list pagination, auto-scroll and row formatting
//! - **Graphics**: `embedded-graphics` implementations of the capabilities
//! - **Display** (embedded): SSD1306 128×64 OLED via I²C, tick-driven task
//! - **Buttons** (embedded): 3 tactile switches with debouncing

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;
pub mod graphics;
pub mod input_logic;
pub mod render;
pub mod surface;


/// Physical button events (after debouncing).
///
///   - UP/DOWN: scroll the device list by one row
///   - SELECT: clear the list and start over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Up,
    Down,
    Select,
}
