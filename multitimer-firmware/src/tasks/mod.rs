//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod peer;
pub mod power;
pub mod tick;
pub mod vibe;

pub use controller::{controller_task, Platform};
pub use peer::{peer_rx_task, peer_tx_task};
pub use power::power_task;
pub use tick::tick_task;
pub use vibe::vibe_task;
