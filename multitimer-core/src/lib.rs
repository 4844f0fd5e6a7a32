//! Board-agnostic countdown timer and stopwatch engine
//!
//! This crate contains all timer logic that does not depend on specific
//! hardware implementations:
//!
//! - Fixed-capacity record store (countdowns and stopwatches)
//! - Per-second tick and alert state machine
//! - Versioned persistence with forward-only migration
//! - Wake-up scheduling across shutdown
//! - Bounded icon bitmap cache
//! - Mapping between the record store and the sectioned list view
//!
//! Platform services (storage, haptics, wake-up, clock) come in through
//! the `multitimer-hal` traits; rendering and peer notification through
//! the traits in [`traits`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod icon_cache;
pub mod notify;
pub mod persist;
pub mod record;
pub mod state;
pub mod traits;
pub mod view;
pub mod wake;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use record::{RecordKind, RecordStore, TimerRecord, MAX_TIMERS};
pub use state::{RecordState, RowIndicator, TickOutcome};
pub use view::{Section, ViewCoordinate};
