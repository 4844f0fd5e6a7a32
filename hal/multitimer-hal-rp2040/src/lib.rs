//! RP2040-specific HAL for the Multi-Timer+ wearable
//!
//! Implements the `multitimer-hal` traits on RP2040 peripherals:
//!
//! - Flash-backed integer store (sequential-storage map)
//! - RTC wall clock
//! - Wake facility in the watchdog scratch registers
//! - Vibration motor driver and a channel-backed haptics handle

#![no_std]

pub mod flash;
pub mod rtc;
pub mod vibe;
pub mod wakeup;

pub use flash::FlashIntStore;
pub use rtc::RtcClock;
pub use vibe::{ChannelHaptics, VibeChannel, VibeMotor};
pub use wakeup::ScratchWake;

// Re-export shared traits from multitimer-hal for convenience
pub use multitimer_hal::{Clock, Haptics, IntStore, LaunchReason, StorageKey, WakeFacility};
