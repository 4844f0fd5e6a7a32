//! Outbound notifications to the paired peer

use crate::error::NotifyError;

/// Best-effort notifications about countdowns starting and stopping
///
/// Never called for stopwatches. Failures are reported but the engine
/// does not retry.
pub trait PeerNotifier {
    /// A countdown started with `remaining_sec` left
    fn notify_add(&mut self, index: usize, remaining_sec: i32, title: &str)
        -> Result<(), NotifyError>;

    /// A countdown stopped or was refused
    fn notify_remove(&mut self, index: usize) -> Result<(), NotifyError>;
}
