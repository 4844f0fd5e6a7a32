//! Vibration motor on a GPIO
//!
//! The engine only queues patterns through [`ChannelHaptics`]; a task owns
//! the [`VibeMotor`] and plays them back one after another.

use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Timer;

use multitimer_hal::{Haptics, VibePattern};

/// Patterns that may wait behind the one playing
pub const VIBE_QUEUE_LEN: usize = 4;

/// Queue between the engine and the motor task
pub type VibeChannel = Channel<CriticalSectionRawMutex, VibePattern, VIBE_QUEUE_LEN>;

/// Non-blocking [`Haptics`] handle that queues patterns
#[derive(Clone, Copy)]
pub struct ChannelHaptics {
    channel: &'static VibeChannel,
}

impl ChannelHaptics {
    pub fn new(channel: &'static VibeChannel) -> Self {
        Self { channel }
    }
}

impl Haptics for ChannelHaptics {
    fn pulse(&mut self, pattern: VibePattern) {
        if self.channel.try_send(pattern).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("vibe: queue full, dropping {}", pattern);
        }
    }
}

/// Motor driven high for the "on" segments of a pattern
pub struct VibeMotor<'d> {
    pin: Output<'d>,
}

impl<'d> VibeMotor<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }

    /// Play a pattern to completion; the motor is off afterwards
    pub async fn play(&mut self, pattern: VibePattern) {
        for (i, ms) in pattern.segments().iter().enumerate() {
            if i % 2 == 0 {
                self.pin.set_high();
            } else {
                self.pin.set_low();
            }
            Timer::after_millis(u64::from(*ms)).await;
        }
        self.pin.set_low();
    }
}
