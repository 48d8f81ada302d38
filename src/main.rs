//! blelist firmware - nRF52840 + S140 SoftDevice + SSD1306 OLED.
//!
//! Task layout:
//!   - `softdevice_task`: SoftDevice event pump
//!   - `scanner_task`: continuous BLE scan into `REGISTRY`
//!   - `display_task`: tick-driven list rendering, consumes button events
//!   - `button_task` (x3): debounced GPIO input

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::bind_interrupts;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use nrf_softdevice::{raw, Softdevice};
use {defmt_rtt as _, panic_probe as _};

use blelist::config::{DEFAULT_TITLE, REGISTRY_CAPACITY};
use blelist::schema::{validate, ComponentConfig, Resource, ValidatedConfig};
use blelist::ui::display::{self, Display};
use blelist::ui::{buttons, ButtonEvent};
use blelist::{ble, DeviceRegistry};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
});

/// Every device heard by the scanner.
static REGISTRY: DeviceRegistry<CriticalSectionRawMutex, REGISTRY_CAPACITY> = DeviceRegistry::new();

/// Debounced button presses for the display task.
static BUTTONS: Channel<CriticalSectionRawMutex, ButtonEvent, 4> = Channel::new();

/// Resources the board provides.
const RESOURCES: [Resource<'static>; 2] = [Resource::font("font_6x10"), Resource::display("oled")];

/// The list component as wired on this board.
const LIST_CONFIG: ComponentConfig<'static> = ComponentConfig {
    id: "ble_list",
    font: Some("font_6x10"),
    display: Some("oled"),
    scroll_interval: None,
    title: Some(DEFAULT_TITLE),
};

type Oled = Display<Twim<'static, TWISPI0>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("blelist starting");

    // The SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::TWISPI0.set_priority(Priority::P3);

    let list_config = match validate(&LIST_CONFIG, &RESOURCES) {
        Ok(validated) => validated,
        Err(errors) => {
            for e in errors.iter() {
                defmt::error!("config: {}", e);
            }
            defmt::panic!("invalid list configuration");
        }
    };

    let sd_config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 0,
            central_role_count: 1,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        ..Default::default()
    };
    let sd: &'static Softdevice = Softdevice::enable(&sd_config);
    unwrap!(spawner.spawn(softdevice_task(sd)));

    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let oled = match display::init(i2c) {
        Ok(oled) => oled,
        Err(e) => defmt::panic!("OLED init failed: {}", e),
    };

    unwrap!(spawner.spawn(scanner_task(sd)));
    unwrap!(spawner.spawn(display_task(oled, list_config)));

    let tx = BUTTONS.sender();
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade(), ButtonEvent::Up, tx)));
    unwrap!(spawner.spawn(button_task(p.P0_12.degrade(), ButtonEvent::Down, tx)));
    unwrap!(spawner.spawn(button_task(p.P0_24.degrade(), ButtonEvent::Select, tx)));

    info!("all tasks spawned");
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn scanner_task(sd: &'static Softdevice) -> ! {
    ble::scanner::run(sd, &REGISTRY).await
}

#[embassy_executor::task]
async fn display_task(oled: Oled, config: ValidatedConfig<'static>) -> ! {
    display::run(oled, config, &REGISTRY, BUTTONS.receiver()).await
}

#[embassy_executor::task(pool_size = 3)]
async fn button_task(
    pin: AnyPin,
    event: ButtonEvent,
    tx: Sender<'static, CriticalSectionRawMutex, ButtonEvent, 4>,
) -> ! {
    buttons::button_task(pin, event, tx).await
}
