//! One-shot wake-up facility
//!
//! A scheduled wake restarts the application at a wall-clock time after it
//! has shut down. The restarted application learns why it was started
//! through [`LaunchReason`].

/// Why the application was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaunchReason {
    /// Opened by the user
    #[default]
    User,
    /// Started by a scheduled wake event
    Wakeup,
}

/// Errors from wake scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeError {
    /// Requested time has already passed
    InPast,
    /// No wake slot available
    Full,
    /// Facility could not be accessed
    Unavailable,
}

/// Wake-up scheduler
pub trait WakeFacility {
    /// Schedule a wake-up at `timestamp` (unix seconds)
    fn schedule(&mut self, timestamp: i64) -> Result<(), WakeError>;

    /// Cancel every pending wake-up scheduled by this application
    fn cancel_all(&mut self);
}
