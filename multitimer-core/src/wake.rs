//! Wake-up scheduling across shutdown
//!
//! Only running countdowns can wake the device. The wake time is placed a
//! few seconds before the earliest expiry so the engine is loaded and
//! ticking when it fires.

use multitimer_hal::{Clock, WakeFacility};

use crate::config::EngineConfig;
use crate::record::RecordStore;

/// Earliest wake time for the running countdowns, if any
///
/// `shutdown + min(remaining) - lead_sec`, without the past-time clamp.
pub fn wake_time(records: &RecordStore, shutdown: i64, lead_sec: u32) -> Option<i64> {
    records
        .iter()
        .filter(|r| r.is_running() && !r.is_counting_up())
        .map(|r| r.remaining_sec())
        .min()
        .map(|remaining| shutdown + remaining - i64::from(lead_sec))
}

/// Replace any pending wake with one for the earliest running countdown
///
/// Pending wakes are cancelled even when nothing is left to schedule.
/// The clock is read again after computing the wake time; a wake that
/// already lies in the past is pushed to `now + grace`. Returns the
/// scheduled time.
pub fn schedule_wake<W: WakeFacility, C: Clock>(
    records: &RecordStore,
    wake: &mut W,
    clock: &C,
    shutdown: i64,
    config: &EngineConfig,
) -> Option<i64> {
    wake.cancel_all();
    let at = wake_time(records, shutdown, config.wake_lead_sec)?;

    let now = clock.now();
    let at = if at < now {
        now + i64::from(config.wake_grace_sec)
    } else {
        at
    };

    match wake.schedule(at) {
        Ok(()) => {
            #[cfg(feature = "defmt")]
            defmt::info!("wake: scheduled at {}", at);
            Some(at)
        }
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("wake: could not schedule at {}: {}", at, _err);
            None
        }
    }
}
