//! Mapping between the flat record store and the sectioned list view
//!
//! The list shows four sections: a "new timer" action, the countdowns, a
//! "new stopwatch" action, and the stopwatches. Countdowns and stopwatches
//! share one physical array, so a record's row within its section is the
//! number of same-kind records before it.

use crate::record::{RecordKind, RecordStore};

/// List sections, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Section {
    NewTimer = 0,
    Timers = 1,
    NewStopwatch = 2,
    Stopwatches = 3,
}

impl Section {
    /// All sections in display order
    pub const ALL: [Section; 4] = [
        Section::NewTimer,
        Section::Timers,
        Section::NewStopwatch,
        Section::Stopwatches,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Section::NewTimer),
            1 => Some(Section::Timers),
            2 => Some(Section::NewStopwatch),
            3 => Some(Section::Stopwatches),
            _ => None,
        }
    }

    /// Record kind listed in this section, `None` for the action rows
    pub fn kind(self) -> Option<RecordKind> {
        match self {
            Section::Timers => Some(RecordKind::Countdown),
            Section::Stopwatches => Some(RecordKind::Stopwatch),
            Section::NewTimer | Section::NewStopwatch => None,
        }
    }

    /// Section listing records of `kind`
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Countdown => Section::Timers,
            RecordKind::Stopwatch => Section::Stopwatches,
        }
    }
}

/// A (section, row) position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ViewCoordinate {
    pub section: Section,
    pub row: u16,
}

impl ViewCoordinate {
    pub const fn new(section: Section, row: u16) -> Self {
        Self { section, row }
    }
}

impl Default for ViewCoordinate {
    fn default() -> Self {
        Self::new(Section::NewTimer, 0)
    }
}

impl RecordStore {
    /// Number of rows in a section
    pub fn row_count(&self, section: Section) -> u16 {
        match section.kind() {
            Some(kind) => self.iter().filter(|r| r.kind() == kind).count() as u16,
            None => 1,
        }
    }

    /// Where a record appears in the list
    pub fn coordinate_of(&self, index: usize) -> Option<ViewCoordinate> {
        let kind = self.get(index)?.kind();
        let row = self.iter().take(index).filter(|r| r.kind() == kind).count();
        Some(ViewCoordinate::new(Section::for_kind(kind), row as u16))
    }

    /// Record shown at a list position, `None` for action rows or past
    /// the end of the section
    pub fn index_at(&self, coord: ViewCoordinate) -> Option<usize> {
        let kind = coord.section.kind()?;
        self.iter()
            .enumerate()
            .filter(|(_, r)| r.kind() == kind)
            .nth(coord.row as usize)
            .map(|(index, _)| index)
    }
}
