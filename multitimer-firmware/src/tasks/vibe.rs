//! Vibration motor task
//!
//! Plays queued patterns back to back.

use defmt::*;

use multitimer_hal_rp2040::VibeMotor;

use crate::channels::VIBE_CHANNEL;

#[embassy_executor::task]
pub async fn vibe_task(mut motor: VibeMotor<'static>) {
    info!("Vibe task started");

    loop {
        let pattern = VIBE_CHANNEL.receive().await;
        trace!("Playing {:?}", pattern);
        motor.play(pattern).await;
    }
}
