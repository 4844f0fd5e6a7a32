//! One-second tick for the timer engine

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Signal to notify the controller of a tick; carries seconds since boot
///
/// A tick the controller has not consumed yet is overwritten, so ticks
/// are lost rather than coalesced.
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - signals the controller once per second
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut seconds: u32 = 0;

    loop {
        ticker.next().await;
        seconds = seconds.wrapping_add(1);
        TICK_SIGNAL.signal(seconds);
    }
}
