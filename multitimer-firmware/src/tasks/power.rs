//! Power button task
//!
//! A short press toggles the highlighted record; holding the button
//! shuts the device down.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::{ButtonEvent, BUTTON_CHANNEL};

/// Contact bounce settle time
const DEBOUNCE_MS: u64 = 20;

/// Hold time for a long press
pub const LONG_PRESS_MS: u64 = 1500;

/// Power button task - the button pulls the pin low
#[embassy_executor::task]
pub async fn power_task(mut button: Input<'static>) {
    info!("Power task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_high() {
            continue;
        }

        let event = match select(
            button.wait_for_rising_edge(),
            Timer::after_millis(LONG_PRESS_MS),
        )
        .await
        {
            Either::First(_) => ButtonEvent::Short,
            Either::Second(_) => ButtonEvent::Long,
        };

        debug!("Button: {:?}", event);
        if BUTTON_CHANNEL.try_send(event).is_err() {
            warn!("Button channel full, dropping event");
        }

        if button.is_low() {
            button.wait_for_high().await;
        }
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
