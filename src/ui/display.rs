//! SSD1306 OLED display wrapper and the list refresh loop.

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Receiver;
use embassy_time::{Duration, Ticker};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::ble::registry::DeviceRegistry;
use crate::component::BleListDisplay;
use crate::config::RENDER_TICK_MS;
use crate::error::Error;
use crate::schema::ValidatedConfig;
use crate::ui::graphics::GraphicsSurface;
use crate::ui::ButtonEvent;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

/// Redraw the device list every `RENDER_TICK_MS` and apply button presses.
///
/// A failed frame or flush is logged and retried on the next tick.
pub async fn run<I2C, M, const N: usize>(
    display: Display<I2C>,
    config: ValidatedConfig<'static>,
    registry: &'static DeviceRegistry<M, N>,
    buttons: Receiver<'static, CriticalSectionRawMutex, ButtonEvent, 4>,
) -> !
where
    I2C: embedded_hal::i2c::I2c,
    M: RawMutex,
{
    let mut surface = GraphicsSurface::new(display, &FONT_6X10, BinaryColor::On, BinaryColor::Off);
    let mut component = BleListDisplay::new(&config, &FONT_6X10, &mut surface, registry);
    let mut ticker = Ticker::every(Duration::from_millis(RENDER_TICK_MS));

    info!("display: {} ready", component.id());

    loop {
        match select(ticker.next(), buttons.receive()).await {
            Either::First(()) => {
                if component.on_tick().is_err() {
                    continue;
                }
                if component.surface_mut().target_mut().flush().is_err() {
                    warn!("display: flush failed");
                }
            }
            Either::Second(event) => component.on_button(event),
        }
    }
}
