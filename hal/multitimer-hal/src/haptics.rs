//! Vibration motor abstraction

/// Short pulse on-time in milliseconds
pub const SHORT_PULSE_MS: u32 = 100;

/// Long pulse on-time in milliseconds
pub const LONG_PULSE_MS: u32 = 500;

/// A vibration pattern
///
/// Patterns are alternating on/off segments in milliseconds, starting
/// with "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VibePattern {
    /// Two short pulses
    DoublePulse,
    /// One long pulse
    LongPulse,
    /// One short pulse
    ShortPulse,
    /// Caller-supplied on/off segments
    Custom(&'static [u32]),
}

impl VibePattern {
    /// On/off segments of this pattern in milliseconds
    pub fn segments(&self) -> &'static [u32] {
        match self {
            VibePattern::DoublePulse => &[SHORT_PULSE_MS, SHORT_PULSE_MS, SHORT_PULSE_MS],
            VibePattern::LongPulse => &[LONG_PULSE_MS],
            VibePattern::ShortPulse => &[SHORT_PULSE_MS],
            VibePattern::Custom(segments) => segments,
        }
    }

    /// Total duration of the pattern in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.segments().iter().sum()
    }
}

/// Vibration motor
///
/// `pulse` must not block for the duration of the pattern; implementations
/// queue the pattern and play it in the background. Dropped patterns are
/// acceptable when the motor is busy.
pub trait Haptics {
    /// Play a vibration pattern
    fn pulse(&mut self, pattern: VibePattern);
}
