//! Bounded registry of discovered BLE devices.
//!
//! The scan callback writes into the registry while the display task reads
//! snapshots of it, possibly from a different execution context.  All state
//! lives behind an `embassy_sync` blocking mutex; every operation holds the
//! lock only for one short critical section and never awaits inside it.
//!
//! Records are kept unordered in storage.  Ordering (most recently seen
//! first, then strongest signal, then lowest address) is applied to the
//! snapshot copy, outside the lock.

use core::cell::RefCell;
use core::cmp::Ordering;
use core::ops::Deref;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::{String, Vec};

use crate::ble::adv_parser::parse_advertisement;
use crate::ble::{DeviceAddress, ScanFilter};
use crate::config::NAME_CAPACITY;

/// One discovered device.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceRecord {
    /// BLE address (the registry key).
    pub address: DeviceAddress,
    /// Advertised local name, empty if the device never sent one.
    pub name: String<NAME_CAPACITY>,
    /// Received Signal Strength Indicator of the latest advertisement (dBm).
    pub rssi: i8,
    /// Timestamp (monotonic ticks) of the latest advertisement.
    pub last_seen: u64,
}

impl DeviceRecord {
    fn new(address: DeviceAddress, name: &str, rssi: i8, last_seen: u64) -> Self {
        Self {
            address,
            name: truncated_name(name),
            rssi,
            last_seen,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Display ordering: newest first, then strongest signal, then lowest
    /// address.  Total for records with distinct addresses.
    pub fn display_order(&self, other: &Self) -> Ordering {
        other
            .last_seen
            .cmp(&self.last_seen)
            .then(other.rssi.cmp(&self.rssi))
            .then(self.address.cmp(&other.address))
    }
}

/// Copy `name` into fixed storage, dropping whole characters that do not fit.
fn truncated_name(name: &str) -> String<NAME_CAPACITY> {
    let mut out = String::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Lifetime counters, kept across [`DeviceRegistry::clear`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryStats {
    /// New devices added.
    pub inserted: u32,
    /// Advertisements applied to an existing record.
    pub updated: u32,
    /// Records dropped to make room (with capacity zero, every new device).
    pub evicted: u32,
    /// Advertisements older than the stored last-seen, ignored.
    pub stale: u32,
    /// Payloads the advertisement parser rejected.
    pub malformed: u32,
    /// Well-formed payloads rejected by the scan filter.
    pub filtered: u32,
}

impl RegistryStats {
    const ZERO: Self = Self {
        inserted: 0,
        updated: 0,
        evicted: 0,
        stale: 0,
        malformed: 0,
        filtered: 0,
    };
}

fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}

struct Inner<const N: usize> {
    records: Vec<DeviceRecord, N>,
    capacity: usize,
    filter: ScanFilter,
    stats: RegistryStats,
}

impl<const N: usize> Inner<N> {
    fn record(&mut self, address: DeviceAddress, name: &str, rssi: i8, timestamp: u64) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.address == address) {
            if timestamp < existing.last_seen {
                bump(&mut self.stats.stale);
                return;
            }
            if !name.is_empty() {
                existing.name = truncated_name(name);
            }
            existing.rssi = rssi;
            existing.last_seen = timestamp;
            bump(&mut self.stats.updated);
            return;
        }

        if self.capacity == 0 {
            bump(&mut self.stats.evicted);
            return;
        }

        if self.records.len() >= self.capacity {
            if let Some(index) = self.oldest_index() {
                let _evicted = self.records.swap_remove(index);
                bump(&mut self.stats.evicted);
                #[cfg(feature = "defmt")]
                defmt::trace!("registry full, evicted {}", _evicted.address);
            }
        }

        // len < capacity <= N here, so the push cannot fail.
        let _ = self
            .records
            .push(DeviceRecord::new(address, name, rssi, timestamp));
        bump(&mut self.stats.inserted);
    }

    /// Index of the record that sorts last, i.e. the least recently seen.
    fn oldest_index(&self) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.display_order(b))
            .map(|(index, _)| index)
    }
}

/// Bounded, thread-safe set of discovered devices keyed by address.
///
/// `N` is the storage bound; the effective capacity may be set lower at
/// construction.  `M` selects the raw mutex (`CriticalSectionRawMutex` when
/// the scan callback runs in interrupt context).
pub struct DeviceRegistry<M: RawMutex, const N: usize> {
    inner: Mutex<M, RefCell<Inner<N>>>,
}

impl<M: RawMutex, const N: usize> DeviceRegistry<M, N> {
    /// Registry with capacity `N`.
    pub const fn new() -> Self {
        Self::with_capacity(N)
    }

    /// Registry holding at most `capacity` records (clamped to `N`).
    pub const fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity < N { capacity } else { N };
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                records: Vec::new(),
                capacity,
                filter: ScanFilter::ALLOW_ALL,
                stats: RegistryStats::ZERO,
            })),
        }
    }

    /// Insert or update the record for `address`.
    ///
    /// An empty `name` keeps the stored one.  Advertisements older than the
    /// stored last-seen are ignored.  When a new device arrives and the
    /// registry is full, the least recently seen record is evicted first.
    pub fn record_advertisement(&self, address: DeviceAddress, name: &str, rssi: i8, timestamp: u64) {
        self.inner
            .lock(|cell| cell.borrow_mut().record(address, name, rssi, timestamp));
    }

    /// Parse a raw advertising payload and record it.
    ///
    /// Malformed payloads and payloads rejected by the scan filter are
    /// dropped and counted; neither is an error for the caller.
    pub fn ingest(&self, address: DeviceAddress, rssi: i8, data: &[u8], timestamp: u64) {
        let fields = match parse_advertisement(data) {
            Ok(fields) => fields,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("dropping advertisement from {}: {}", address, _e);
                self.inner
                    .lock(|cell| bump(&mut cell.borrow_mut().stats.malformed));
                return;
            }
        };

        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            if !inner.filter.admits(rssi, &fields) {
                bump(&mut inner.stats.filtered);
                return;
            }
            inner.record(address, fields.name_or_empty(), rssi, timestamp);
        });
    }

    /// Ordered copy of the current records.
    pub fn snapshot(&self) -> Snapshot<N> {
        let mut records = self.inner.lock(|cell| cell.borrow().records.clone());
        records.sort_unstable_by(DeviceRecord::display_order);
        Snapshot { records }
    }

    /// Remove every record.  Counters and the filter are kept.
    pub fn clear(&self) {
        self.inner.lock(|cell| cell.borrow_mut().records.clear());
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().capacity)
    }

    pub fn stats(&self) -> RegistryStats {
        self.inner.lock(|cell| cell.borrow().stats)
    }

    pub fn filter(&self) -> ScanFilter {
        self.inner.lock(|cell| cell.borrow().filter)
    }

    /// Replace the admission filter.  Records already stored are kept.
    pub fn set_filter(&self, filter: ScanFilter) {
        self.inner.lock(|cell| cell.borrow_mut().filter = filter);
    }
}

impl<M: RawMutex, const N: usize> Default for DeviceRegistry<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the registry, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot<const N: usize> {
    records: Vec<DeviceRecord, N>,
}

impl<const N: usize> Snapshot<N> {
    /// Position of `address` in display order.
    pub fn rank_of(&self, address: DeviceAddress) -> Option<usize> {
        self.records.iter().position(|r| r.address == address)
    }
}

impl<const N: usize> Deref for Snapshot<N> {
    type Target = [DeviceRecord];

    fn deref(&self) -> &[DeviceRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    type Registry<const N: usize> = DeviceRegistry<CriticalSectionRawMutex, N>;

    fn addr(n: u8) -> DeviceAddress {
        DeviceAddress::new([0xC0, 0xFF, 0xEE, 0x00, 0x00, n])
    }

    fn addresses<const N: usize>(snapshot: &Snapshot<N>) -> std::vec::Vec<DeviceAddress> {
        snapshot.iter().map(|r| r.address).collect()
    }

    #[test]
    fn snapshot_holds_latest_values() {
        let registry: Registry<4> = Registry::new();
        registry.record_advertisement(addr(1), "Tag", -70, 10);
        registry.record_advertisement(addr(2), "Watch", -50, 11);
        registry.record_advertisement(addr(1), "Tag", -40, 12);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].address, addr(1));
        assert_eq!(snapshot[0].rssi, -40);
        assert_eq!(snapshot[0].last_seen, 12);
        assert_eq!(snapshot[1].name.as_str(), "Watch");
    }

    #[test]
    fn empty_name_keeps_stored_name() {
        let registry: Registry<4> = Registry::new();
        registry.record_advertisement(addr(1), "Scale", -60, 1);
        registry.record_advertisement(addr(1), "", -61, 2);
        registry.record_advertisement(addr(2), "", -61, 3);

        let snapshot = registry.snapshot();
        let scale = &snapshot[snapshot.rank_of(addr(1)).unwrap()];
        assert_eq!(scale.name.as_str(), "Scale");
        assert_eq!(scale.rssi, -61);
        assert!(!snapshot[0].has_name());
    }

    #[test]
    fn long_name_is_truncated_to_capacity() {
        let registry: Registry<2> = Registry::new();
        let long = "X".repeat(40);
        registry.record_advertisement(addr(1), &long, -60, 1);
        assert_eq!(registry.snapshot()[0].name.len(), NAME_CAPACITY);
    }

    #[test]
    fn never_exceeds_capacity() {
        let registry: Registry<5> = Registry::new();
        let mut seed: u32 = 0x1234_5678;
        for t in 0..500u64 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let id = (seed >> 24) as u8 % 23;
            let rssi = -(((seed >> 8) as u8 % 90) as i8);
            registry.record_advertisement(addr(id), "", rssi, t);
            assert!(registry.len() <= 5);
        }
        assert_eq!(registry.snapshot().len(), 5);
    }

    #[test]
    fn eviction_removes_least_recently_seen() {
        let registry: Registry<3> = Registry::new();
        registry.record_advertisement(addr(1), "", -40, 5);
        registry.record_advertisement(addr(2), "", -40, 1);
        registry.record_advertisement(addr(3), "", -40, 9);
        registry.record_advertisement(addr(4), "", -90, 10);

        let snapshot = registry.snapshot();
        assert_eq!(addresses(&snapshot), [addr(4), addr(3), addr(1)]);
        assert_eq!(registry.stats().evicted, 1);
    }

    #[test]
    fn eviction_tie_drops_the_record_sorting_last() {
        let registry: Registry<2> = Registry::new();
        registry.record_advertisement(addr(1), "", -30, 7);
        registry.record_advertisement(addr(2), "", -80, 7);
        registry.record_advertisement(addr(3), "", -50, 8);

        assert_eq!(addresses(&registry.snapshot()), [addr(3), addr(1)]);
    }

    #[test]
    fn updating_a_known_device_never_evicts() {
        let registry: Registry<2> = Registry::new();
        registry.record_advertisement(addr(1), "", -30, 1);
        registry.record_advertisement(addr(2), "", -30, 2);
        registry.record_advertisement(addr(1), "", -30, 3);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.stats().evicted, 0);
        assert_eq!(registry.stats().updated, 1);
    }

    #[test]
    fn ordering_uses_recency_then_rssi_then_address() {
        let registry: Registry<8> = Registry::new();
        registry.record_advertisement(addr(5), "", -70, 3);
        registry.record_advertisement(addr(4), "", -50, 3);
        registry.record_advertisement(addr(3), "", -50, 3);
        registry.record_advertisement(addr(2), "", -20, 1);
        registry.record_advertisement(addr(1), "", -90, 4);

        let snapshot = registry.snapshot();
        assert_eq!(
            addresses(&snapshot),
            [addr(1), addr(3), addr(4), addr(5), addr(2)]
        );
        for pair in snapshot.windows(2) {
            assert!(pair[0].last_seen >= pair[1].last_seen);
        }
        assert_eq!(snapshot.rank_of(addr(4)), Some(2));
        assert_eq!(snapshot.rank_of(addr(9)), None);
    }

    #[test]
    fn stale_advertisement_is_ignored() {
        let registry: Registry<2> = Registry::new();
        registry.record_advertisement(addr(1), "New", -40, 20);
        registry.record_advertisement(addr(1), "Old", -90, 10);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].name.as_str(), "New");
        assert_eq!(snapshot[0].rssi, -40);
        assert_eq!(snapshot[0].last_seen, 20);
        assert_eq!(registry.stats().stale, 1);
    }

    #[test]
    fn clear_twice_is_same_as_once() {
        let registry: Registry<4> = Registry::new();
        registry.record_advertisement(addr(1), "", -40, 1);
        registry.clear();
        assert!(registry.is_empty());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
        assert_eq!(registry.stats().inserted, 1);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let registry: Registry<4> = Registry::with_capacity(0);
        for t in 0..10 {
            registry.record_advertisement(addr(t as u8), "Beacon", -40, t);
        }
        assert_eq!(registry.capacity(), 0);
        assert!(registry.snapshot().is_empty());

        let unbacked: Registry<0> = Registry::new();
        unbacked.record_advertisement(addr(1), "", -40, 1);
        assert!(unbacked.snapshot().is_empty());
    }

    #[test]
    fn capacity_is_clamped_to_storage() {
        let registry: Registry<3> = Registry::with_capacity(10);
        assert_eq!(registry.capacity(), 3);
    }

    #[test]
    fn ingest_uses_advertised_name() {
        let registry: Registry<4> = Registry::new();
        let payload = [0x02, 0x01, 0x06, 0x05, 0x09, b'L', b'a', b'm', b'p'];
        registry.ingest(addr(1), -55, &payload, 3);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].name.as_str(), "Lamp");
        assert_eq!(snapshot[0].rssi, -55);
    }

    #[test]
    fn ingest_counts_malformed_payloads() {
        let registry: Registry<4> = Registry::new();
        registry.ingest(addr(1), -55, &[0x09, 0x09, b'A'], 1);
        registry.ingest(addr(2), -55, &[0x03, 0x09, 0xFF, 0xFE], 2);

        assert!(registry.is_empty());
        assert_eq!(registry.stats().malformed, 2);
    }

    #[test]
    fn ingest_applies_scan_filter() {
        let registry: Registry<4> = Registry::new();
        registry.set_filter(ScanFilter {
            min_rssi: Some(-70),
            service_uuid16: Some(0x180F),
        });
        let battery = [0x03, 0x03, 0x0F, 0x18];
        let hid = [0x03, 0x03, 0x12, 0x18];

        registry.ingest(addr(1), -60, &battery, 1);
        registry.ingest(addr(2), -80, &battery, 2);
        registry.ingest(addr(3), -60, &hid, 3);

        assert_eq!(addresses(&registry.snapshot()), [addr(1)]);
        assert_eq!(registry.stats().filtered, 2);
    }

    #[test]
    fn filter_matches_uuid_in_a_late_list() {
        let registry: Registry<4> = Registry::new();
        registry.set_filter(ScanFilter {
            min_rssi: None,
            service_uuid16: Some(0x180F),
        });
        let payload = [
            0x03, 0x02, 0x01, 0x18, //
            0x03, 0x02, 0x02, 0x18, //
            0x03, 0x02, 0x03, 0x18, //
            0x03, 0x02, 0x04, 0x18, //
            0x03, 0x03, 0x0F, 0x18, //
        ];

        registry.ingest(addr(1), -60, &payload, 1);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.stats().filtered, 0);
    }

    #[test]
    fn concurrent_ingest_and_snapshot() {
        static REGISTRY: Registry<8> = Registry::new();

        std::thread::scope(|s| {
            s.spawn(|| {
                for t in 0..2_000u64 {
                    let id = (t % 13) as u8;
                    REGISTRY.record_advertisement(addr(id), "Sensor", -((t % 100) as i8), t);
                }
            });
            s.spawn(|| {
                for _ in 0..500 {
                    let snapshot = REGISTRY.snapshot();
                    assert!(snapshot.len() <= 8);
                    for pair in snapshot.windows(2) {
                        assert_ne!(pair[0].display_order(&pair[1]), Ordering::Greater);
                    }
                    for record in snapshot.iter() {
                        assert_eq!(record.name.as_str(), "Sensor");
                    }
                }
            });
        });

        assert_eq!(REGISTRY.len(), 8);
    }
}
