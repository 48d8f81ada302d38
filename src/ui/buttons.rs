//! Active-low push buttons (internal pull-up), one task per pin.
//!
//! UP/DOWN scroll the list one row, SELECT clears it.  A press counts once
//! the pin has stayed low for `BUTTON_DEBOUNCE_MS`; shorter dips are
//! contact bounce.

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::ui::ButtonEvent;
use defmt::{debug, trace};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{with_timeout, Duration, Timer};

/// Report `event` once per debounced press of `pin`.
pub async fn button_task(
    pin: AnyPin,
    event: ButtonEvent,
    tx: Sender<'static, CriticalSectionRawMutex, ButtonEvent, 4>,
) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let settle = Duration::from_millis(BUTTON_DEBOUNCE_MS);

    loop {
        btn.wait_for_low().await;
        if with_timeout(settle, btn.wait_for_high()).await.is_ok() {
            trace!("button: {} bounce", event);
            continue;
        }

        // The queue only fills while the display task is stalled.  Presses
        // queued behind it would replay as stale scrolls, so extras go.
        if tx.try_send(event).is_err() {
            debug!("button: {} dropped, queue full", event);
        }

        btn.wait_for_high().await;
        Timer::after(settle).await;
    }
}
