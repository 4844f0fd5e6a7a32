//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use multitimer_hal_rp2040::VibeChannel;
use multitimer_protocol::{Frame, PeerReply};

/// Channel capacity for button events
const BUTTON_CHANNEL_SIZE: usize = 4;

/// Frames that may wait for the UART
const PEER_TX_CHANNEL_SIZE: usize = 2;

/// Button gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ButtonEvent {
    /// Toggle the highlighted record
    Short,
    /// Shut down
    Long,
}

/// Button gestures from the power task
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Haptic patterns queued by the engine
pub static VIBE_CHANNEL: VibeChannel = Channel::new();

/// Frames for the companion link
pub static PEER_TX_CHANNEL: Channel<CriticalSectionRawMutex, Frame, PEER_TX_CHANNEL_SIZE> =
    Channel::new();

/// Outcome of the last frame sent to the companion
pub static PEER_REPLY: Signal<CriticalSectionRawMutex, PeerReply> = Signal::new();
