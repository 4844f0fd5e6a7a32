//! Multi-Timer+ - Countdown Timer & Stopwatch Firmware
//!
//! Main firmware binary for RP2040-based wearables. Runs up to ten
//! countdowns and stopwatches, buzzes when a countdown expires and keeps
//! counting across shutdown by waking shortly before the next expiry.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::watchdog::Watchdog;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use multitimer_hal_rp2040::{FlashIntStore, RtcClock, ScratchWake, VibeMotor};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Multi-Timer+ firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Launch reason and wall clock survive the watchdog reset
    let mut wake = ScratchWake::new(Watchdog::new(p.WATCHDOG));
    let launch = wake.launch_reason();

    let mut clock = RtcClock::new(p.RTC);
    if !clock.is_running() {
        let now = wake.saved_clock().unwrap_or(config::BUILD_EPOCH);
        info!("RTC not running, setting to {}", now);
        clock.set_unix(now);
    }

    let mut store = FlashIntStore::new(p.FLASH, p.DMA_CH0);
    let engine_config = config::load_engine_config(&mut store);

    // Setup UART for the companion link
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion link");

    // Vibration motor on GPIO2, power button on GPIO3 (active low)
    let motor = VibeMotor::new(Output::new(p.PIN_2, Level::Low));
    let button = Input::new(p.PIN_3, Pull::Up);

    let platform = tasks::Platform {
        store,
        clock,
        wake,
        launch,
    };

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::vibe_task(motor)).unwrap();
    spawner.spawn(tasks::peer_tx_task(tx)).unwrap();
    spawner.spawn(tasks::peer_rx_task(rx)).unwrap();
    spawner.spawn(tasks::power_task(button)).unwrap();
    spawner
        .spawn(tasks::controller_task(platform, engine_config))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
