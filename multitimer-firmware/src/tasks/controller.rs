//! Main controller task
//!
//! Owns the timer engine. Loads it at boot, advances it on every tick,
//! routes button gestures and companion replies into it, and on shutdown
//! saves it, schedules the wake and parks until the device restarts.

use defmt::*;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_time::Timer;

use multitimer_core::notify::MessageNotifier;
use multitimer_core::{Engine, EngineConfig};
use multitimer_hal_rp2040::{ChannelHaptics, Clock, FlashIntStore, LaunchReason, RtcClock, ScratchWake};

use crate::channels::{ButtonEvent, BUTTON_CHANNEL, PEER_REPLY, VIBE_CHANNEL};
use crate::tasks::peer::PeerSink;
use crate::tasks::tick::TICK_SIGNAL;

/// Platform services handed to the controller
pub struct Platform {
    pub store: FlashIntStore<'static>,
    pub clock: RtcClock<'static>,
    pub wake: ScratchWake,
    pub launch: LaunchReason,
}

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(platform: Platform, config: EngineConfig) {
    info!("Controller task started");

    let Platform {
        mut store,
        clock,
        mut wake,
        launch,
    } = platform;
    let mut haptics = ChannelHaptics::new(&VIBE_CHANNEL);
    let mut notifier = MessageNotifier::new(PeerSink);

    let mut engine = Engine::new(config);
    let report = engine.load(&mut store, &mut haptics, &mut wake, clock.now(), launch);
    info!(
        "Engine loaded: {} records, launch {:?}, first run {}",
        engine.records().len(),
        launch,
        report.first_run
    );

    loop {
        match select3(
            TICK_SIGNAL.wait(),
            BUTTON_CHANNEL.receive(),
            PEER_REPLY.wait(),
        )
        .await
        {
            Either3::First(_) => {
                let outcome = engine.on_tick(&mut haptics);
                notifier.on_tick();
                for index in outcome.expired() {
                    info!("Countdown {} expired", index);
                }
            }

            Either3::Second(ButtonEvent::Short) => {
                let selection = engine.list_selection();
                match engine.records().index_at(selection) {
                    Some(index) => {
                        match engine.toggle_running(index, &mut haptics, &mut notifier) {
                            Ok(toggle) => debug!("Record {}: {:?}", index, toggle),
                            Err(e) => warn!("Toggle failed: {:?}", e),
                        }
                    }
                    None => debug!("No record at {:?}", selection),
                }
            }

            Either3::Second(ButtonEvent::Long) => break,

            Either3::Third(reply) => {
                trace!("Peer reply: {:?}", reply);
                notifier.on_reply(reply);
            }
        }
    }

    info!("Shutting down");
    let wake_at = engine.shutdown(&mut store, &mut wake, &clock);
    match wake_at {
        Some(at) => info!("Wake scheduled at {}", at),
        None => info!("No countdown running, no wake scheduled"),
    }

    park(&mut wake, &clock, wake_at).await
}

/// Sleep until the scheduled wake or a button press, then restart
async fn park(wake: &mut ScratchWake, clock: &RtcClock<'static>, wake_at: Option<i64>) -> ! {
    let sleep = async {
        match wake_at {
            Some(at) => {
                let secs = (at - clock.now()).max(0) as u64;
                Timer::after_secs(secs).await;
            }
            None => core::future::pending::<()>().await,
        }
    };

    match select(sleep, BUTTON_CHANNEL.receive()).await {
        Either::First(_) => {
            info!("Scheduled wake");
            wake.fire(clock.now())
        }
        Either::Second(_) => {
            info!("Woken by button");
            wake.restart(clock.now())
        }
    }
}
