//! Human-readable durations for list rows and the detail view

use core::fmt::Write;

use heapless::String;

use crate::catalog;
use crate::error::EngineError;
use crate::record::TimerRecord;

const SECS_PER_MINUTE: u32 = 60;
const SECS_PER_HOUR: u32 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u32 = 24 * SECS_PER_HOUR;

/// Largest value each duration picker field accepts (inclusive)
pub const MAX_DAYS: u32 = 1000;
pub const MAX_HOURS: u32 = 24;
pub const MAX_MINUTES: u32 = 60;
pub const MAX_SECONDS: u32 = 60;

/// A duration split into days, hours, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dhms {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Dhms {
    /// Split a second count
    pub fn from_secs(secs: u32) -> Self {
        Self {
            days: secs / SECS_PER_DAY,
            hours: secs % SECS_PER_DAY / SECS_PER_HOUR,
            minutes: secs % SECS_PER_HOUR / SECS_PER_MINUTE,
            seconds: secs % SECS_PER_MINUTE,
        }
    }

    /// Total seconds, rejecting fields above their picker limits
    pub fn to_secs(&self) -> Result<u32, EngineError> {
        if self.days > MAX_DAYS
            || self.hours > MAX_HOURS
            || self.minutes > MAX_MINUTES
            || self.seconds > MAX_SECONDS
        {
            return Err(EngineError::OutOfRange);
        }
        Ok(self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds)
    }
}

/// Text of a list row
pub type RowText = String<16>;

/// Compact duration for a list row
///
/// `123d04`, `3d04:05`, ` 4:05:06`, ` 5:06`
pub fn format_row(secs: u32) -> RowText {
    let t = Dhms::from_secs(secs);
    let mut text = RowText::new();
    // Longest output is "49710d06", well inside capacity
    let _ = if t.days > 99 {
        write!(text, "{}d{:02}", t.days, t.hours)
    } else if t.days > 0 {
        write!(text, "{}d{:02}:{:02}", t.days, t.hours, t.minutes)
    } else if t.hours > 0 {
        write!(text, "{:2}:{:02}:{:02}", t.hours, t.minutes, t.seconds)
    } else {
        write!(text, "{:2}:{:02}", t.minutes, t.seconds)
    };
    text
}

/// Row text for a record
///
/// Alerting records alternate between their icon label (`blink_on`) and
/// their time.
pub fn row_text(record: &TimerRecord, blink_on: bool) -> RowText {
    if blink_on && record.is_alerting() {
        let mut text = RowText::new();
        if let Some(icon) = catalog::icon_entry(record.icon()) {
            let _ = text.push_str(icon.label);
        }
        return text;
    }
    format_row(record.remaining_or_elapsed())
}

/// Detail-view fields for a record
///
/// Days and hours are hidden (`None`) when they and every larger unit are
/// zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailText {
    pub days: Option<String<8>>,
    pub hours: Option<String<4>>,
    pub time: String<8>,
}

impl DetailText {
    pub fn for_secs(secs: u32) -> Self {
        let t = Dhms::from_secs(secs);

        let days = (t.days > 0).then(|| {
            let mut s = String::new();
            let _ = write!(s, "{}", t.days);
            s
        });
        let hours = (t.hours > 0 || t.days > 0).then(|| {
            let mut s = String::new();
            let _ = write!(s, "{:02}", t.hours);
            s
        });
        let mut time = String::new();
        let _ = write!(time, "{:02}:{:02}", t.minutes, t.seconds);

        Self { days, hours, time }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;

    #[test]
    fn test_row_formats() {
        assert_eq!(format_row(65).as_str(), " 1:05");
        assert_eq!(format_row(600).as_str(), "10:00");
        assert_eq!(format_row(3 * 3600 + 5 * 60 + 9).as_str(), " 3:05:09");
        assert_eq!(format_row(2 * 86400 + 3600 + 120).as_str(), "2d01:02");
        assert_eq!(format_row(150 * 86400 + 7 * 3600).as_str(), "150d07");
        assert_eq!(format_row(0).as_str(), " 0:00");
    }

    #[test]
    fn test_dhms_limits() {
        let d = Dhms {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
        };
        assert_eq!(d.to_secs(), Ok(93_784));
        assert_eq!(Dhms::from_secs(93_784), d);

        let too_many = Dhms {
            days: MAX_DAYS + 1,
            ..Dhms::default()
        };
        assert_eq!(too_many.to_secs(), Err(EngineError::OutOfRange));
        let max = Dhms {
            days: MAX_DAYS,
            hours: MAX_HOURS,
            minutes: MAX_MINUTES,
            seconds: MAX_SECONDS,
        };
        assert!(max.to_secs().is_ok());
    }

    #[test]
    fn test_alerting_row_blinks_label() {
        let mut record = TimerRecord::countdown(90);
        record.set_icon(1).unwrap();
        record.alert_sec = 2;

        assert_eq!(row_text(&record, true).as_str(), "egg");
        assert_eq!(row_text(&record, false).as_str(), " 1:30");
    }

    #[test]
    fn test_stopwatch_row_shows_elapsed() {
        let mut record = TimerRecord::new(RecordKind::Stopwatch);
        record.elapsed_sec = 61;
        assert_eq!(row_text(&record, true).as_str(), " 1:01");
    }

    #[test]
    fn test_detail_hides_empty_units() {
        let short = DetailText::for_secs(75);
        assert_eq!(short.days, None);
        assert_eq!(short.hours, None);
        assert_eq!(short.time.as_str(), "01:15");

        let long = DetailText::for_secs(86400 + 30);
        assert_eq!(long.days.as_deref(), Some("1"));
        assert_eq!(long.hours.as_deref(), Some("00"));
        assert_eq!(long.time.as_str(), "00:30");
    }
}
