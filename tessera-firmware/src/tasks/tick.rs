//! Tick task for time-based updates
//!
//! Drives everything animated in the controller: clock seconds, demo
//! screen rotation, snake steps and animation frames. The payload is the
//! uptime in milliseconds; the controller uses the same time base for
//! command-driven renders, so renderer timestamps never mix clocks.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 20;

/// Signal to notify the controller of a tick, payload is uptime in ms
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with a millisecond timestamp
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));

    loop {
        ticker.next().await;

        let now_ms = Instant::now().as_millis() as u32;
        TICK_SIGNAL.signal(now_ms);
    }
}
