//! One-second advance of every record

use super::events::{TickEvent, TickOutcome};
use crate::record::RecordStore;

/// Advance every record by one second
///
/// Running records count one second. A running countdown with no time
/// left expires: elapsed resets, the alert counter is loaded with the
/// record's repeat count, it stops, and its pattern is pulsed once.
/// Already-alerting countdowns consume one alert second each; the last of
/// them in index order contributes a single pulse for the whole tick.
///
/// The caller plays `pulses` and moves the list selection to the expired
/// record.
pub fn advance(store: &mut RecordStore) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    for record in store.iter_mut() {
        if record.running {
            record.elapsed_sec = record.elapsed_sec.saturating_add(1);
            outcome.active = true;
        } else if record.alert_sec > 0 {
            outcome.active = true;
        }
    }

    let mut alerting = None;
    for (index, record) in store.iter_mut().enumerate() {
        if record.is_counting_up() {
            continue;
        }

        if record.running && record.remaining_sec() <= 0 {
            record.elapsed_sec = 0;
            record.alert_sec = record.repeats();
            record.running = false;
            outcome.push_event(TickEvent::Expired { index });
            outcome.push_pulse(record.pattern());
        } else if record.alert_sec > 0 {
            record.alert_sec -= 1;
            alerting = Some((index, record.pattern()));
            if record.alert_sec == 0 {
                outcome.push_event(TickEvent::AlertFinished { index });
            }
        }
    }

    if let Some((index, pattern)) = alerting {
        outcome.push_event(TickEvent::AlertPulse { index });
        outcome.push_pulse(pattern);
    }

    outcome
}
