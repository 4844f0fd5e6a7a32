//! Record states and the status indicator derived from them

use crate::record::TimerRecord;

/// Where a record is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordState {
    /// Stopped, no alert pending
    Idle,
    /// Counting once per tick
    Running,
    /// Countdown expired; alert pulses still pending
    Alerting,
}

impl RecordState {
    /// Check if this state needs a redraw every tick
    pub fn is_active(&self) -> bool {
        matches!(self, RecordState::Running | RecordState::Alerting)
    }
}

/// Status glyph drawn next to a list row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RowIndicator {
    /// Nothing to show
    None,
    /// Counting
    Running,
    /// Stopped part-way
    Paused,
    /// Expired countdown; blinks
    Alerting,
}

impl RowIndicator {
    /// Indicator for a record
    pub fn for_record(record: &TimerRecord) -> Self {
        match record.state() {
            RecordState::Running => RowIndicator::Running,
            RecordState::Alerting => RowIndicator::Alerting,
            RecordState::Idle if record.elapsed_sec() > 0 => RowIndicator::Paused,
            RecordState::Idle => RowIndicator::None,
        }
    }
}
