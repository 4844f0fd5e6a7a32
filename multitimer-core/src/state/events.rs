//! What happened during a tick

use heapless::Vec;
use multitimer_hal::VibePattern;

use crate::record::MAX_TIMERS;

/// A state change observed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickEvent {
    /// Countdown reached zero and started alerting
    Expired { index: usize },
    /// An alert repeat pulse was emitted for this record
    AlertPulse { index: usize },
    /// Last alert pulse consumed; record is idle again
    AlertFinished { index: usize },
}

/// Summary of one tick
///
/// `pulses` lists the haptic patterns to play, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub events: Vec<TickEvent, { 2 * MAX_TIMERS + 1 }>,
    pub pulses: Vec<VibePattern, { MAX_TIMERS + 1 }>,
    /// Some record was running or alerting; the list needs a redraw
    pub active: bool,
}

impl TickOutcome {
    pub(crate) fn push_event(&mut self, event: TickEvent) {
        // Capacity covers one expiry or finish per record plus one pulse
        let _ = self.events.push(event);
    }

    pub(crate) fn push_pulse(&mut self, pattern: VibePattern) {
        let _ = self.pulses.push(pattern);
    }

    /// Indices of records that expired this tick, in index order
    pub fn expired(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|event| match event {
            TickEvent::Expired { index } => Some(*index),
            _ => None,
        })
    }

    /// Last record to expire this tick
    pub fn last_expired(&self) -> Option<usize> {
        self.expired().last()
    }
}
