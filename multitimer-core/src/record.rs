//! Timer records and the fixed-capacity record store
//!
//! The store is a flat array of up to [`MAX_TIMERS`] records. Deleting a
//! record shifts every later record down one slot, so indices are only
//! valid until the next delete; callers re-resolve through the view
//! mapper instead of holding on to them.

use heapless::Vec;
use multitimer_hal::VibePattern;

use crate::catalog::{self, ICON_COUNT, VIBE_PATTERN_COUNT, VIBE_REPEAT_COUNT};
use crate::error::EngineError;
use crate::state::RecordState;

/// Maximum number of live records
pub const MAX_TIMERS: usize = 10;

/// Whether a record counts down to an alert or up without limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordKind {
    /// Counts down from `total_sec` and alerts at zero
    #[default]
    Countdown,
    /// Counts up, never expires
    Stopwatch,
}

impl RecordKind {
    /// True for stopwatches
    pub fn is_counting_up(self) -> bool {
        self == RecordKind::Stopwatch
    }

    /// Kind from the persisted "counting up" flag
    pub fn from_counting_up(flag: bool) -> Self {
        if flag {
            RecordKind::Stopwatch
        } else {
            RecordKind::Countdown
        }
    }
}

/// One countdown or stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerRecord {
    pub(crate) total_sec: u32,
    pub(crate) elapsed_sec: u32,
    pub(crate) alert_sec: u32,
    pub(crate) icon: u8,
    pub(crate) vibe_pattern: u8,
    pub(crate) vibe_repeat: u8,
    pub(crate) running: bool,
    pub(crate) kind: RecordKind,
}

impl TimerRecord {
    /// A zeroed, stopped record of the given kind
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// A stopped countdown with the given duration
    pub fn countdown(total_sec: u32) -> Self {
        Self {
            total_sec,
            ..Self::new(RecordKind::Countdown)
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn is_counting_up(&self) -> bool {
        self.kind.is_counting_up()
    }

    pub fn total_sec(&self) -> u32 {
        self.total_sec
    }

    pub fn elapsed_sec(&self) -> u32 {
        self.elapsed_sec
    }

    /// Alert pulses still to come; non-zero while alerting
    pub fn alert_sec(&self) -> u32 {
        self.alert_sec
    }

    pub fn icon(&self) -> u8 {
        self.icon
    }

    pub fn vibe_pattern(&self) -> u8 {
        self.vibe_pattern
    }

    pub fn vibe_repeat(&self) -> u8 {
        self.vibe_repeat
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_alerting(&self) -> bool {
        self.alert_sec > 0
    }

    /// Seconds left for a countdown (negative once overdue)
    pub fn remaining_sec(&self) -> i64 {
        i64::from(self.total_sec) - i64::from(self.elapsed_sec)
    }

    /// The value a row displays: time left for a countdown, time counted
    /// for a stopwatch
    pub fn remaining_or_elapsed(&self) -> u32 {
        if self.is_counting_up() {
            self.elapsed_sec
        } else {
            self.total_sec.saturating_sub(self.elapsed_sec)
        }
    }

    /// Current position in the Idle → Running → Alerting cycle
    pub fn state(&self) -> RecordState {
        if self.running {
            RecordState::Running
        } else if self.alert_sec > 0 {
            RecordState::Alerting
        } else {
            RecordState::Idle
        }
    }

    /// Number of alert pulses configured for this record
    pub fn repeats(&self) -> u32 {
        catalog::repeat_count(self.vibe_repeat)
    }

    /// Haptic pattern configured for this record
    pub fn pattern(&self) -> VibePattern {
        catalog::vibe_pattern(self.vibe_pattern)
    }

    /// Set the duration; counting restarts from zero
    pub fn set_total(&mut self, total_sec: u32) {
        self.total_sec = total_sec;
        self.elapsed_sec = 0;
    }

    pub fn set_icon(&mut self, icon: u8) -> Result<(), EngineError> {
        self.icon = checked_index(icon, ICON_COUNT)?;
        Ok(())
    }

    pub fn set_vibe_pattern(&mut self, pattern: u8) -> Result<(), EngineError> {
        self.vibe_pattern = checked_index(pattern, VIBE_PATTERN_COUNT)?;
        Ok(())
    }

    pub fn set_vibe_repeat(&mut self, repeat: u8) -> Result<(), EngineError> {
        self.vibe_repeat = checked_index(repeat, VIBE_REPEAT_COUNT)?;
        Ok(())
    }
}

fn checked_index(value: u8, count: usize) -> Result<u8, EngineError> {
    if (value as usize) < count {
        Ok(value)
    } else {
        Err(EngineError::OutOfRange)
    }
}

/// Result of flipping a record's running flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Toggle {
    /// Record was running and is now stopped
    Stopped,
    /// Record is now running
    Started,
    /// Zero-length countdown; left stopped
    Refused,
}

/// Fixed-capacity array of records plus the selected record
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TimerRecord, MAX_TIMERS>,
    cur: Option<usize>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.is_full()
    }

    /// Live records in index order
    pub fn iter(&self) -> impl Iterator<Item = &TimerRecord> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimerRecord> {
        self.records.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&TimerRecord> {
        self.records.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut TimerRecord> {
        self.records.get_mut(index)
    }

    /// Append a zeroed record; returns its index
    pub fn append(&mut self, kind: RecordKind) -> Result<usize, EngineError> {
        self.push(TimerRecord::new(kind))
    }

    /// Append a fully populated record; returns its index
    pub fn push(&mut self, record: TimerRecord) -> Result<usize, EngineError> {
        self.records
            .push(record)
            .map_err(|_| EngineError::CapacityExceeded)?;
        Ok(self.records.len() - 1)
    }

    /// Remove a record, shifting later records down
    ///
    /// If the selected record was deleted, or the selection now points
    /// past the end, the selection moves to the last record.
    pub fn delete(&mut self, index: usize) -> Result<TimerRecord, EngineError> {
        if index >= self.records.len() {
            return Err(EngineError::NotFound);
        }
        let removed = self.records.remove(index);

        let len = self.records.len();
        if let Some(cur) = self.cur {
            if cur == index || cur >= len {
                self.cur = len.checked_sub(1);
            }
        }
        Ok(removed)
    }

    /// Drop every record and the selection
    pub fn clear(&mut self) {
        self.records.clear();
        self.cur = None;
    }

    /// Display value for a record, `None` past the end
    pub fn remaining_or_elapsed(&self, index: usize) -> Option<u32> {
        self.get(index).map(TimerRecord::remaining_or_elapsed)
    }

    /// Flip a record between running and stopped
    pub fn toggle_running(&mut self, index: usize) -> Result<Toggle, EngineError> {
        let record = self.get_mut(index).ok_or(EngineError::NotFound)?;

        if record.running {
            record.running = false;
            Ok(Toggle::Stopped)
        } else if !record.is_counting_up() && record.total_sec == 0 {
            Ok(Toggle::Refused)
        } else {
            record.alert_sec = 0;
            record.running = true;
            Ok(Toggle::Started)
        }
    }

    /// Clear the counted time of a stopped record
    pub fn reset(&mut self, index: usize) -> Result<(), EngineError> {
        let record = self.get_mut(index).ok_or(EngineError::NotFound)?;
        if record.running {
            return Err(EngineError::RecordRunning);
        }
        record.elapsed_sec = 0;
        Ok(())
    }

    /// Make `index` the selected record
    pub fn select(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.records.len() {
            return Err(EngineError::NotFound);
        }
        self.cur = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.cur = None;
    }

    /// Index of the selected record
    pub fn selected(&self) -> Option<usize> {
        self.cur
    }

    pub(crate) fn selected_mut(&mut self) -> Result<&mut TimerRecord, EngineError> {
        let cur = self.cur.ok_or(EngineError::NoSelection)?;
        self.records.get_mut(cur).ok_or(EngineError::NoSelection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store_with(kinds: &[RecordKind]) -> RecordStore {
        let mut store = RecordStore::new();
        for kind in kinds {
            store.append(*kind).unwrap();
        }
        store
    }

    #[test]
    fn test_append_returns_previous_len() {
        let mut store = RecordStore::new();
        assert_eq!(store.append(RecordKind::Countdown), Ok(0));
        assert_eq!(store.append(RecordKind::Stopwatch), Ok(1));

        let record = store.get(1).unwrap();
        assert!(record.is_counting_up());
        assert_eq!(record.total_sec(), 0);
        assert_eq!(record.state(), RecordState::Idle);
    }

    #[test]
    fn test_append_when_full() {
        let mut store = store_with(&[RecordKind::Countdown; MAX_TIMERS]);
        assert_eq!(
            store.append(RecordKind::Countdown),
            Err(EngineError::CapacityExceeded)
        );
        assert_eq!(store.len(), MAX_TIMERS);
    }

    #[test]
    fn test_delete_compacts() {
        let mut store = RecordStore::new();
        for total in [10, 20, 30] {
            store.push(TimerRecord::countdown(total)).unwrap();
        }

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.total_sec(), 20);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().total_sec(), 30);
        assert_eq!(store.delete(2), Err(EngineError::NotFound));
    }

    #[test]
    fn test_delete_last_selected_moves_selection() {
        let mut store = store_with(&[RecordKind::Countdown; 3]);
        store.select(2).unwrap();

        store.delete(2).unwrap();
        assert_eq!(store.selected(), Some(1));
    }

    #[test]
    fn test_delete_selected_in_middle() {
        let mut store = store_with(&[RecordKind::Countdown; 3]);
        store.select(1).unwrap();

        store.delete(1).unwrap();
        assert_eq!(store.selected(), Some(1));
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = store_with(&[RecordKind::Countdown; 3]);
        store.select(0).unwrap();

        store.delete(2).unwrap();
        assert_eq!(store.selected(), Some(0));
    }

    #[test]
    fn test_delete_only_record_clears_selection() {
        let mut store = store_with(&[RecordKind::Stopwatch]);
        store.select(0).unwrap();

        store.delete(0).unwrap();
        assert_eq!(store.selected(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_zero_countdown_refused() {
        let mut store = store_with(&[RecordKind::Countdown]);
        assert_eq!(store.toggle_running(0), Ok(Toggle::Refused));
        assert!(!store.get(0).unwrap().is_running());
    }

    #[test]
    fn test_toggle_stopwatch_with_zero_total_starts() {
        let mut store = store_with(&[RecordKind::Stopwatch]);
        assert_eq!(store.toggle_running(0), Ok(Toggle::Started));
        assert_eq!(store.toggle_running(0), Ok(Toggle::Stopped));
    }

    #[test]
    fn test_start_clears_alert() {
        let mut store = RecordStore::new();
        let mut record = TimerRecord::countdown(60);
        record.alert_sec = 3;
        store.push(record).unwrap();

        assert_eq!(store.toggle_running(0), Ok(Toggle::Started));
        let record = store.get(0).unwrap();
        assert_eq!(record.alert_sec(), 0);
        assert_eq!(record.state(), RecordState::Running);
    }

    #[test]
    fn test_reset_requires_stopped() {
        let mut store = RecordStore::new();
        let mut record = TimerRecord::countdown(60);
        record.elapsed_sec = 12;
        store.push(record).unwrap();

        store.toggle_running(0).unwrap();
        assert_eq!(store.reset(0), Err(EngineError::RecordRunning));

        store.toggle_running(0).unwrap();
        store.reset(0).unwrap();
        assert_eq!(store.get(0).unwrap().elapsed_sec(), 0);
    }

    #[test]
    fn test_setters_reject_out_of_catalog() {
        let mut record = TimerRecord::new(RecordKind::Countdown);
        assert_eq!(record.set_icon(52), Err(EngineError::OutOfRange));
        assert_eq!(record.set_vibe_pattern(4), Err(EngineError::OutOfRange));
        assert_eq!(record.set_vibe_repeat(5), Err(EngineError::OutOfRange));
        record.set_vibe_repeat(4).unwrap();
        assert_eq!(record.repeats(), 1);
    }

    #[test]
    fn test_set_total_resets_elapsed() {
        let mut record = TimerRecord::countdown(60);
        record.elapsed_sec = 30;
        record.set_total(90);
        assert_eq!(record.remaining_or_elapsed(), 90);
    }

    proptest! {
        #[test]
        fn prop_append_then_delete_restores(
            totals in proptest::collection::vec(0u32..100_000, 0..MAX_TIMERS),
            kind_flag in any::<bool>(),
        ) {
            let mut store = RecordStore::new();
            for total in &totals {
                store.push(TimerRecord::countdown(*total)).unwrap();
            }
            let before: std::vec::Vec<TimerRecord> = store.iter().copied().collect();

            let index = store.append(RecordKind::from_counting_up(kind_flag)).unwrap();
            prop_assert_eq!(index, totals.len());
            store.delete(index).unwrap();

            let after: std::vec::Vec<TimerRecord> = store.iter().copied().collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn prop_countdown_remaining_never_increases(total in 1u32..5_000, ticks in 0u32..6_000) {
            let mut record = TimerRecord::countdown(total);
            let mut last = record.remaining_or_elapsed();
            for _ in 0..ticks {
                record.elapsed_sec += 1;
                let now = record.remaining_or_elapsed();
                prop_assert!(now <= last);
                last = now;
            }
        }
    }
}
