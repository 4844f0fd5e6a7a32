//! RTC-backed wall clock

use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_rp::Peri;

use multitimer_hal::{CivilTime, Clock};

/// Wall clock on the RP2040 real-time counter
pub struct RtcClock<'d> {
    rtc: Rtc<'d, RTC>,
}

impl<'d> RtcClock<'d> {
    pub fn new(rtc: Peri<'d, RTC>) -> Self {
        Self { rtc: Rtc::new(rtc) }
    }

    /// Check if the counter has been set since power-on
    pub fn is_running(&mut self) -> bool {
        self.rtc.is_running()
    }

    /// Set the clock to unix seconds
    pub fn set_unix(&mut self, secs: i64) {
        let t = CivilTime::from_unix(secs);
        let datetime = DateTime {
            year: t.year,
            month: t.month,
            day: t.day,
            day_of_week: day_of_week(t.weekday),
            hour: t.hour,
            minute: t.minute,
            second: t.second,
        };
        if let Err(_err) = self.rtc.set_datetime(datetime) {
            #[cfg(feature = "defmt")]
            defmt::error!("rtc: set failed: {}", _err);
        }
    }
}

impl<'d> Clock for RtcClock<'d> {
    fn now(&self) -> i64 {
        match self.rtc.now() {
            Ok(t) => CivilTime {
                year: t.year,
                month: t.month,
                day: t.day,
                hour: t.hour,
                minute: t.minute,
                second: t.second,
                weekday: t.day_of_week as u8,
            }
            .to_unix(),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("rtc: not running: {}", _err);
                0
            }
        }
    }
}

fn day_of_week(weekday: u8) -> DayOfWeek {
    match weekday {
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        6 => DayOfWeek::Saturday,
        _ => DayOfWeek::Sunday,
    }
}
