//! Frame-rate ticker: publishes the frames rendered in each interval.

use defmt::debug;
use embassy_time::{Duration, Ticker};
use thermocam_common::FrameRate;
use thermocam_common::config::FPS_INTERVAL_MS;

#[embassy_executor::task]
pub async fn frame_rate_task(frame_rate: &'static FrameRate) {
    let mut ticker = Ticker::every(Duration::from_millis(FPS_INTERVAL_MS));

    loop {
        ticker.next().await;
        let fps = frame_rate.tick();
        debug!("{} fps", fps);
    }
}
