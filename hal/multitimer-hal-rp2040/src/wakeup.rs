//! Wake facility in the watchdog scratch registers
//!
//! The RP2040 has no timed power-on, so "shutdown" parks the firmware
//! until the pending wake time and then resets through the watchdog. The
//! scratch registers survive that reset and carry the pending wake time,
//! the launch reason and the wall clock across it.
//!
//! Register use:
//! - 0: [`PENDING_MAGIC`] while a wake is pending
//! - 1: pending wake time (unix seconds)
//! - 2: [`LAUNCH_MAGIC`] when the last reset was a scheduled wake
//! - 3: [`CLOCK_MAGIC`] when register 4 holds the time of the last reset
//! - 4: wall clock at the last reset (unix seconds)

use embassy_rp::watchdog::Watchdog;

use multitimer_hal::{LaunchReason, WakeError, WakeFacility};

pub const PENDING_MAGIC: u32 = 0x5741_4B45; // "WAKE"
pub const LAUNCH_MAGIC: u32 = 0x4C4E_4348; // "LNCH"
pub const CLOCK_MAGIC: u32 = 0x434C_4F4B; // "CLOK"

const REG_PENDING: usize = 0;
const REG_TIME: usize = 1;
const REG_LAUNCH: usize = 2;
const REG_CLOCK_VALID: usize = 3;
const REG_CLOCK: usize = 4;

/// One-slot wake facility over the watchdog
pub struct ScratchWake {
    watchdog: Watchdog,
}

impl ScratchWake {
    pub fn new(watchdog: Watchdog) -> Self {
        Self { watchdog }
    }

    /// Why this boot happened; consumes the launch marker
    pub fn launch_reason(&mut self) -> LaunchReason {
        let reason = if self.watchdog.get_scratch(REG_LAUNCH) == LAUNCH_MAGIC {
            LaunchReason::Wakeup
        } else {
            LaunchReason::User
        };
        self.watchdog.set_scratch(REG_LAUNCH, 0);
        reason
    }

    /// Wall clock saved by the reset that started this boot
    pub fn saved_clock(&mut self) -> Option<i64> {
        if self.watchdog.get_scratch(REG_CLOCK_VALID) == CLOCK_MAGIC {
            self.watchdog.set_scratch(REG_CLOCK_VALID, 0);
            Some(i64::from(self.watchdog.get_scratch(REG_CLOCK)))
        } else {
            None
        }
    }

    /// Pending wake time, if one is scheduled
    pub fn pending(&mut self) -> Option<i64> {
        if self.watchdog.get_scratch(REG_PENDING) == PENDING_MAGIC {
            Some(i64::from(self.watchdog.get_scratch(REG_TIME)))
        } else {
            None
        }
    }

    /// Restart as a scheduled wake
    pub fn fire(&mut self, now: i64) -> ! {
        self.cancel_all();
        self.watchdog.set_scratch(REG_LAUNCH, LAUNCH_MAGIC);
        self.restart(now)
    }

    /// Restart as a user launch
    pub fn restart(&mut self, now: i64) -> ! {
        if let Ok(now) = u32::try_from(now) {
            self.watchdog.set_scratch(REG_CLOCK, now);
            self.watchdog.set_scratch(REG_CLOCK_VALID, CLOCK_MAGIC);
        }
        self.watchdog.trigger_reset();
        loop {
            core::hint::spin_loop();
        }
    }
}

impl WakeFacility for ScratchWake {
    fn schedule(&mut self, timestamp: i64) -> Result<(), WakeError> {
        let time = u32::try_from(timestamp).map_err(|_| WakeError::InPast)?;
        if self.pending().is_some() {
            return Err(WakeError::Full);
        }
        self.watchdog.set_scratch(REG_TIME, time);
        self.watchdog.set_scratch(REG_PENDING, PENDING_MAGIC);
        Ok(())
    }

    fn cancel_all(&mut self) {
        self.watchdog.set_scratch(REG_PENDING, 0);
        self.watchdog.set_scratch(REG_TIME, 0);
    }
}
