//! BLE GAP scanner - feeds every advertisement into the device registry.
//!
//! Uses the SoftDevice Central-role scanning API.  The scan runs in
//! windows of `BLE_SCAN_WINDOW_SECS`; each window ends with the
//! SoftDevice's scan timeout and the next one starts immediately.

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Timer};
use nrf_softdevice::ble::central;
use nrf_softdevice::Softdevice;

use crate::ble::registry::DeviceRegistry;
use crate::ble::DeviceAddress;
use crate::config::BLE_SCAN_WINDOW_SECS;
use crate::error::BleError;

/// Back-off before retrying after the SoftDevice refused to scan.
const RETRY_DELAY_MS: u64 = 1000;

/// Run one scan window, recording every report into `registry`.
///
/// Returns `Ok(())` when the window times out normally.
pub async fn scan_window<M: RawMutex, const N: usize>(
    sd: &Softdevice,
    registry: &DeviceRegistry<M, N>,
) -> Result<(), BleError> {
    let config = central::ScanConfig {
        // Active scan to retrieve scan-response data (device names).
        active: true,
        // SoftDevice timeout unit is 10 ms.
        timeout: (BLE_SCAN_WINDOW_SECS * 100) as u16,
        ..Default::default()
    };

    let result = central::scan(sd, &config, |params| {
        let data =
            unsafe { core::slice::from_raw_parts(params.data.p_data, params.data.len as usize) };
        let address = DeviceAddress::from_le_bytes(params.peer_addr.addr);
        registry.ingest(address, params.rssi, data, Instant::now().as_millis());

        // Never stop early; the window ends on timeout.
        None::<()>
    })
    .await;

    match result {
        Ok(()) | Err(central::ScanError::Timeout) => Ok(()),
        Err(central::ScanError::Raw(e)) => Err(BleError::Raw(e as u32)),
    }
}

/// Scan forever.
pub async fn run<M: RawMutex, const N: usize>(
    sd: &'static Softdevice,
    registry: &'static DeviceRegistry<M, N>,
) -> ! {
    info!("BLE scanner starting ({} s windows)", BLE_SCAN_WINDOW_SECS);

    loop {
        match scan_window(sd, registry).await {
            Ok(()) => {
                let stats = registry.stats();
                info!(
                    "scan window done: {} devices, {} new, {} evicted, {} malformed",
                    registry.len(),
                    stats.inserted,
                    stats.evicted,
                    stats.malformed
                );
            }
            Err(e) => {
                warn!("BLE scan failed: {}", e);
                Timer::after(Duration::from_millis(RETRY_DELAY_MS)).await;
            }
        }
    }
}
