//! Versioned persistence of the record store
//!
//! Everything is stored as integers under the keys in [`keys`]. Storage
//! failures never propagate: a failed read yields the default value and a
//! failed write is logged and dropped, so a broken store degrades the
//! engine to its initial state instead of halting it.

pub mod keys;
pub mod migration;

use multitimer_hal::{IntStore, StorageError, StorageKey};

use crate::config::EngineConfig;
use crate::record::{RecordStore, TimerRecord, MAX_TIMERS};
use crate::view::{Section, ViewCoordinate};

use keys::{
    record_key, Field, CURRENT_VERSION, KEY_LIST_ROW, KEY_LIST_SECTION, KEY_NUM_TIMERS,
    KEY_SHUTDOWN_TIME, KEY_VERSION,
};

/// Read a value, falling back to `default` when absent or unreadable
pub(crate) fn read_or<S: IntStore>(store: &mut S, key: StorageKey, default: i32) -> i32 {
    match store.read(key) {
        Ok(value) => value,
        Err(StorageError::NotFound) => default,
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("storage: read of key {} failed: {}", key, _err);
            default
        }
    }
}

/// Write a value, remembering the first failure in `result`
fn write_logged<S: IntStore>(
    store: &mut S,
    key: StorageKey,
    value: i32,
    result: &mut Result<(), StorageError>,
) {
    if let Err(err) = store.write(key, value) {
        #[cfg(feature = "defmt")]
        defmt::warn!("storage: write of key {} failed: {}", key, err);
        if result.is_ok() {
            *result = Err(err);
        }
    }
}

/// What [`load`] found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// No record count was stored; defaults were seeded
    pub first_run: bool,
    /// Stored schema version (0 when absent)
    pub version: i32,
    /// Seconds the device was shut down, when a shutdown was recorded
    pub fast_forward_sec: Option<u32>,
    /// Persisted list selection
    pub list_selection: ViewCoordinate,
}

/// Rebuild `records` from storage
///
/// Seeds the configured default countdowns on first run. When the
/// previous run recorded a shutdown time (schema 2 and later), every
/// record is read in full and running records are advanced by the time
/// spent shut down; the shutdown time is then consumed. Otherwise only
/// totals are restored.
pub fn load<S: IntStore>(
    store: &mut S,
    records: &mut RecordStore,
    config: &EngineConfig,
    now: i64,
) -> LoadReport {
    records.clear();

    let first_run = !store.exists(KEY_NUM_TIMERS);
    if first_run {
        seed_defaults(store, config);
    }

    let count = read_or(store, KEY_NUM_TIMERS, 0).clamp(0, MAX_TIMERS as i32) as usize;
    let version = read_or(store, KEY_VERSION, 0);

    let shutdown = if version >= 2 && store.exists(KEY_SHUTDOWN_TIME) {
        Some(read_or(store, KEY_SHUTDOWN_TIME, 0))
    } else {
        None
    };

    let mut fast_forward_sec = None;
    match shutdown {
        Some(shutdown) => {
            let delta = (now - i64::from(shutdown)).clamp(0, i64::from(u32::MAX)) as u32;
            for index in 0..count {
                let mut record = migration::read_record(store, index, version);
                fast_forward(&mut record, delta);
                let _ = records.push(record);
            }
            if let Err(_err) = store.delete(KEY_SHUTDOWN_TIME) {
                #[cfg(feature = "defmt")]
                defmt::warn!("storage: could not consume shutdown time: {}", _err);
            }
            fast_forward_sec = Some(delta);
        }
        None => {
            for index in 0..count {
                let total = read_or(store, record_key(index, Field::Total), 0);
                let mut record = TimerRecord::default();
                migration::apply_field(&mut record, Field::Total, total);
                let _ = records.push(record);
            }
        }
    }

    LoadReport {
        first_run,
        version,
        fast_forward_sec,
        list_selection: read_list_selection(store),
    }
}

/// Advance a running record by the time spent shut down
///
/// A countdown never counts past its total; the first tick after load
/// expires it.
fn fast_forward(record: &mut TimerRecord, delta: u32) {
    if !record.running {
        return;
    }
    record.elapsed_sec = record.elapsed_sec.saturating_add(delta);
    if !record.is_counting_up() {
        record.elapsed_sec = record.elapsed_sec.min(record.total_sec);
    }
}

fn seed_defaults<S: IntStore>(store: &mut S, config: &EngineConfig) {
    let mut result = Ok(());
    for (index, secs) in config.seed_durations.iter().enumerate() {
        let total = i32::try_from(*secs).unwrap_or(i32::MAX);
        write_logged(store, record_key(index, Field::Total), total, &mut result);
    }
    write_logged(
        store,
        KEY_NUM_TIMERS,
        config.seed_durations.len() as i32,
        &mut result,
    );
}

fn read_list_selection<S: IntStore>(store: &mut S) -> ViewCoordinate {
    let section = read_or(store, KEY_LIST_SECTION, 0);
    let row = read_or(store, KEY_LIST_ROW, 0);

    match (u8::try_from(section).ok().and_then(Section::from_u8), u16::try_from(row)) {
        (Some(section), Ok(row)) => ViewCoordinate::new(section, row),
        _ => ViewCoordinate::default(),
    }
}

/// Write the full current state
///
/// Every write is attempted; the first failure is returned.
pub fn save<S: IntStore>(
    store: &mut S,
    records: &RecordStore,
    list_selection: ViewCoordinate,
) -> Result<(), StorageError> {
    let mut result = Ok(());

    write_logged(
        store,
        KEY_LIST_SECTION,
        list_selection.section.as_u8() as i32,
        &mut result,
    );
    write_logged(store, KEY_LIST_ROW, list_selection.row as i32, &mut result);
    write_logged(store, KEY_VERSION, CURRENT_VERSION, &mut result);
    write_logged(store, KEY_NUM_TIMERS, records.len() as i32, &mut result);

    for (index, record) in records.iter().enumerate() {
        for field in Field::ALL {
            write_logged(
                store,
                record_key(index, field),
                migration::field_value(record, field),
                &mut result,
            );
        }
    }

    result
}

/// Record the shutdown time consumed by the next [`load`]
pub fn save_shutdown_time<S: IntStore>(store: &mut S, now: i64) -> Result<(), StorageError> {
    let mut result = Ok(());
    let now = i32::try_from(now).unwrap_or(i32::MAX);
    write_logged(store, KEY_SHUTDOWN_TIME, now, &mut result);
    result
}

/// Persist a record's total duration
pub fn save_total<S: IntStore>(
    store: &mut S,
    index: usize,
    record: &TimerRecord,
) -> Result<(), StorageError> {
    let mut result = Ok(());
    write_logged(
        store,
        record_key(index, Field::Total),
        migration::field_value(record, Field::Total),
        &mut result,
    );
    result
}

/// Persist a newly appended record and the new record count
pub fn save_new_record<S: IntStore>(
    store: &mut S,
    index: usize,
    record: &TimerRecord,
    count: usize,
) -> Result<(), StorageError> {
    let mut result = Ok(());
    for field in [Field::Total, Field::Kind] {
        write_logged(
            store,
            record_key(index, field),
            migration::field_value(record, field),
            &mut result,
        );
    }
    write_logged(store, KEY_NUM_TIMERS, count as i32, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use crate::testing::MemoryStore;

    #[test]
    fn test_first_run_seeds_three_countdowns() {
        let mut store = MemoryStore::default();
        let mut records = RecordStore::new();

        let report = load(&mut store, &mut records, &EngineConfig::default(), 1_000);

        assert!(report.first_run);
        assert_eq!(report.version, 0);
        let totals: std::vec::Vec<u32> = records.iter().map(|r| r.total_sec()).collect();
        assert_eq!(totals, [60, 300, 600]);
        assert_eq!(store.get(1), Some(3));
    }

    #[test]
    fn test_save_then_load_without_shutdown_keeps_totals_only() {
        let mut store = MemoryStore::default();
        let mut records = RecordStore::new();
        let mut record = TimerRecord::countdown(90);
        record.elapsed_sec = 20;
        record.set_icon(5).unwrap();
        records.push(record).unwrap();

        save(&mut store, &records, ViewCoordinate::new(Section::Timers, 0)).unwrap();
        let report = load(&mut store, &mut records, &EngineConfig::default(), 0);

        assert_eq!(report.version, CURRENT_VERSION);
        assert_eq!(report.fast_forward_sec, None);
        let loaded = records.get(0).unwrap();
        assert_eq!(loaded.total_sec(), 90);
        assert_eq!(loaded.elapsed_sec(), 0);
        assert_eq!(loaded.icon(), 0);
    }

    #[test]
    fn test_shutdown_round_trip_restores_everything() {
        let mut store = MemoryStore::default();
        let mut records = RecordStore::new();

        let mut countdown = TimerRecord::countdown(300);
        countdown.elapsed_sec = 100;
        countdown.set_icon(9).unwrap();
        countdown.set_vibe_pattern(3).unwrap();
        countdown.set_vibe_repeat(2).unwrap();
        records.push(countdown).unwrap();
        records.append(RecordKind::Stopwatch).unwrap();
        records.toggle_running(1).unwrap();

        let selection = ViewCoordinate::new(Section::Stopwatches, 0);
        save(&mut store, &records, selection).unwrap();
        save_shutdown_time(&mut store, 5_000).unwrap();

        let report = load(&mut store, &mut records, &EngineConfig::default(), 5_030);

        assert_eq!(report.fast_forward_sec, Some(30));
        assert_eq!(report.list_selection, selection);
        assert_eq!(records.get(0), Some(&countdown));
        let stopwatch = records.get(1).unwrap();
        assert!(stopwatch.is_counting_up());
        assert_eq!(stopwatch.elapsed_sec(), 30);
        // Consumed exactly once
        assert_eq!(store.get(KEY_SHUTDOWN_TIME.as_u32()), None);
    }

    #[test]
    fn test_fast_forward_clamps_countdown_to_total() {
        let mut store = MemoryStore::default();
        let mut records = RecordStore::new();
        let mut record = TimerRecord::countdown(100);
        record.elapsed_sec = 40;
        records.push(record).unwrap();
        records.toggle_running(0).unwrap();

        save(&mut store, &records, ViewCoordinate::default()).unwrap();
        save_shutdown_time(&mut store, 1_000).unwrap();
        load(&mut store, &mut records, &EngineConfig::default(), 1_070);

        let loaded = records.get(0).unwrap();
        assert_eq!(loaded.elapsed_sec(), 100);
        assert!(loaded.is_running());
    }

    #[test]
    fn test_clock_going_backwards_does_not_rewind() {
        let mut store = MemoryStore::default();
        let mut records = RecordStore::new();
        let mut record = TimerRecord::countdown(100);
        record.elapsed_sec = 40;
        records.push(record).unwrap();
        records.toggle_running(0).unwrap();

        save(&mut store, &records, ViewCoordinate::default()).unwrap();
        save_shutdown_time(&mut store, 1_000).unwrap();
        let report = load(&mut store, &mut records, &EngineConfig::default(), 900);

        assert_eq!(report.fast_forward_sec, Some(0));
        assert_eq!(records.get(0).unwrap().elapsed_sec(), 40);
    }

    #[test]
    fn test_count_is_clamped() {
        let mut store = MemoryStore::default();
        store.set(KEY_NUM_TIMERS.as_u32(), 42);
        let mut records = RecordStore::new();

        load(&mut store, &mut records, &EngineConfig::default(), 0);
        assert_eq!(records.len(), MAX_TIMERS);
    }

    #[test]
    fn test_broken_store_degrades_to_empty() {
        let mut store = MemoryStore {
            broken: true,
            ..MemoryStore::default()
        };
        let mut records = RecordStore::new();
        records.append(RecordKind::Countdown).unwrap();

        let report = load(&mut store, &mut records, &EngineConfig::default(), 0);
        assert!(records.is_empty());
        assert_eq!(report.list_selection, ViewCoordinate::default());
        assert_eq!(
            save(&mut store, &records, ViewCoordinate::default()),
            Err(StorageError::Unavailable)
        );
    }

    #[test]
    fn test_invalid_list_selection_falls_back() {
        let mut store = MemoryStore::default();
        store.set(KEY_NUM_TIMERS.as_u32(), 0);
        store.set(KEY_LIST_SECTION.as_u32(), 9);
        store.set(KEY_LIST_ROW.as_u32(), 1);
        let mut records = RecordStore::new();

        let report = load(&mut store, &mut records, &EngineConfig::default(), 0);
        assert_eq!(report.list_selection, ViewCoordinate::default());
    }
}
