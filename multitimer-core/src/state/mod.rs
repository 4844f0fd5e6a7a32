//! Per-record state machine and the one-second tick
//!
//! Countdowns cycle Idle → Running → Alerting → Idle. Stopwatches only
//! ever move between Idle and Running. State is derived from record
//! fields rather than stored, so it can never disagree with them.

pub mod events;
pub mod machine;
pub mod tick;

pub use events::{TickEvent, TickOutcome};
pub use machine::{RecordState, RowIndicator};
pub use tick::advance;
