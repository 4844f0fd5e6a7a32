//! Multi-Timer+ Platform Abstraction Layer
//!
//! This crate defines the narrow platform traits the timer engine talks to.
//! Chip-specific HALs implement them so the engine itself never touches
//! hardware and can be exercised on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  multitimer-core (engine)               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  multitimer-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ multitimer-   │
//!             │  hal-rp2040   │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`store::IntStore`] - Persistent key → integer storage
//! - [`haptics::Haptics`] - Vibration motor
//! - [`wake::WakeFacility`] - One-shot wake-up after shutdown
//! - [`clock::Clock`] - Wall clock in unix seconds

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod haptics;
pub mod store;
pub mod wake;

// Re-export key traits at crate root for convenience
pub use clock::{CivilTime, Clock};
pub use haptics::{Haptics, VibePattern};
pub use store::{IntStore, StorageError, StorageKey};
pub use wake::{LaunchReason, WakeError, WakeFacility};
