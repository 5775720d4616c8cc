//! Touch button task.
//!
//! The task waits for the pin to reach the level the detector expects next,
//! then waits out the debounce interval and samples. A level wait returns at
//! once when the pin is already there, so a transition that happens while
//! the previous sample is being processed is still picked up.

use defmt::info;
use embassy_rp::gpio::Input;
use embassy_time::{Instant, Timer};
use thermocam_common::Controls;
use thermocam_common::config::DEBOUNCE_MS;
use thermocam_common::input::{EdgeDetector, InputKind};

#[embassy_executor::task(pool_size = 2)]
pub async fn input_task(
    mut pin: Input<'static>,
    kind: InputKind,
    controls: &'static Controls,
) {
    let mut detector = EdgeDetector::new();

    loop {
        if detector.awaited_level() {
            pin.wait_for_high().await;
        } else {
            pin.wait_for_low().await;
        }
        Timer::after_millis(DEBOUNCE_MS).await;

        if let Some(edge) = detector.update(pin.is_high(), Instant::now().as_millis()) {
            controls.apply(kind, edge);
            info!("{} button {}", kind, edge);
        }
    }
}
