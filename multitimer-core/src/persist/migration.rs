//! Forward-only schema migration
//!
//! Each schema version added fields to the per-record layout. Loading
//! walks [`STEPS`] in order and applies every step whose version window
//! contains the stored version; fields introduced later keep their zero
//! default. Nothing is ever rewritten in place: the next save writes the
//! current layout.

use multitimer_hal::IntStore;

use super::keys::{record_key, Field};
use super::read_or;
use crate::catalog::{ICON_COUNT, VIBE_PATTERN_COUNT, VIBE_REPEAT_COUNT};
use crate::record::{RecordKind, TimerRecord};

/// What a migration step does to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepAction {
    /// Read one stored field
    Read(Field),
    /// Schema 2 had no running flag; a record with counted time was
    /// running at shutdown
    InferRunningFromElapsed,
}

/// A migration step applied to stored versions in `since..=until`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub since: i32,
    pub until: Option<i32>,
    pub action: StepAction,
}

impl Step {
    const fn from_version(since: i32, action: StepAction) -> Self {
        Self {
            since,
            until: None,
            action,
        }
    }

    const fn only(version: i32, action: StepAction) -> Self {
        Self {
            since: version,
            until: Some(version),
            action,
        }
    }

    /// Check if this step applies to a stored version
    pub fn applies_to(&self, version: i32) -> bool {
        version >= self.since && self.until.map_or(true, |until| version <= until)
    }
}

/// Steps applied after the total, in order
pub static STEPS: [Step; 7] = [
    Step::from_version(2, StepAction::Read(Field::Elapsed)),
    Step::only(2, StepAction::InferRunningFromElapsed),
    Step::from_version(3, StepAction::Read(Field::Running)),
    Step::from_version(4, StepAction::Read(Field::Icon)),
    Step::from_version(5, StepAction::Read(Field::Kind)),
    Step::from_version(5, StepAction::Read(Field::Vibe)),
    Step::from_version(5, StepAction::Read(Field::VibeRepeat)),
];

/// Read one record stored under `version`
///
/// The total is always read; everything else follows [`STEPS`].
pub fn read_record<S: IntStore>(store: &mut S, index: usize, version: i32) -> TimerRecord {
    let mut record = TimerRecord::default();
    apply_field(&mut record, Field::Total, read_or(store, record_key(index, Field::Total), 0));

    for step in STEPS.iter().filter(|step| step.applies_to(version)) {
        match step.action {
            StepAction::Read(field) => {
                let raw = read_or(store, record_key(index, field), 0);
                apply_field(&mut record, field, raw);
            }
            StepAction::InferRunningFromElapsed => {
                record.running = record.elapsed_sec > 0;
            }
        }
    }
    record
}

/// Store a raw value into a record field
///
/// Negative counters read as zero and indices outside their catalog read
/// as the default entry.
pub fn apply_field(record: &mut TimerRecord, field: Field, raw: i32) {
    match field {
        Field::Total => record.total_sec = raw.max(0) as u32,
        Field::Elapsed => record.elapsed_sec = raw.max(0) as u32,
        Field::Running => record.running = raw != 0,
        Field::Icon => record.icon = catalog_index(raw, ICON_COUNT),
        Field::Kind => record.kind = RecordKind::from_counting_up(raw != 0),
        Field::Vibe => record.vibe_pattern = catalog_index(raw, VIBE_PATTERN_COUNT),
        Field::VibeRepeat => record.vibe_repeat = catalog_index(raw, VIBE_REPEAT_COUNT),
    }
}

/// Raw value of a record field as stored
pub fn field_value(record: &TimerRecord, field: Field) -> i32 {
    match field {
        Field::Total => saturating_i32(record.total_sec),
        Field::Elapsed => saturating_i32(record.elapsed_sec),
        Field::Running => record.running as i32,
        Field::Icon => record.icon as i32,
        Field::Kind => record.is_counting_up() as i32,
        Field::Vibe => record.vibe_pattern as i32,
        Field::VibeRepeat => record.vibe_repeat as i32,
    }
}

fn catalog_index(raw: i32, count: usize) -> u8 {
    if (0..count as i32).contains(&raw) {
        raw as u8
    } else {
        0
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn store_fields(store: &mut MemoryStore, index: usize, fields: &[(Field, i32)]) {
        for (field, value) in fields {
            store.set(record_key(index, *field).as_u32(), *value);
        }
    }

    #[test]
    fn test_version_windows() {
        let v2_heuristic = STEPS[1];
        assert!(v2_heuristic.applies_to(2));
        assert!(!v2_heuristic.applies_to(3));
        assert!(!STEPS[0].applies_to(1));
        assert!(STEPS[6].applies_to(5));
    }

    #[test]
    fn test_v3_record_defaults_later_fields() {
        let mut store = MemoryStore::default();
        store_fields(
            &mut store,
            0,
            &[
                (Field::Total, 120),
                (Field::Elapsed, 30),
                (Field::Running, 0),
                // Present on disk but not part of schema 3
                (Field::Icon, 7),
                (Field::Kind, 1),
                (Field::Vibe, 2),
                (Field::VibeRepeat, 3),
            ],
        );

        let record = read_record(&mut store, 0, 3);
        assert_eq!(record.total_sec(), 120);
        assert_eq!(record.elapsed_sec(), 30);
        // Running comes from the v3 field, not from elapsed > 0
        assert!(!record.is_running());
        assert_eq!(record.icon(), 0);
        assert!(!record.is_counting_up());
        assert_eq!(record.vibe_pattern(), 0);
        assert_eq!(record.vibe_repeat(), 0);
    }

    #[test]
    fn test_v2_infers_running_from_elapsed() {
        let mut store = MemoryStore::default();
        store_fields(&mut store, 0, &[(Field::Total, 60), (Field::Elapsed, 10)]);
        store_fields(&mut store, 1, &[(Field::Total, 60), (Field::Elapsed, 0)]);

        assert!(read_record(&mut store, 0, 2).is_running());
        assert!(!read_record(&mut store, 1, 2).is_running());
    }

    #[test]
    fn test_v1_reads_total_only() {
        let mut store = MemoryStore::default();
        store_fields(&mut store, 0, &[(Field::Total, 45), (Field::Elapsed, 10)]);

        let record = read_record(&mut store, 0, 1);
        assert_eq!(record.total_sec(), 45);
        assert_eq!(record.elapsed_sec(), 0);
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let mut record = TimerRecord::default();
        apply_field(&mut record, Field::Icon, 99);
        apply_field(&mut record, Field::Vibe, -1);
        apply_field(&mut record, Field::Total, -5);
        assert_eq!(record.icon(), 0);
        assert_eq!(record.vibe_pattern(), 0);
        assert_eq!(record.total_sec(), 0);
    }
}
