//! Push button input

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};

use crate::channels::RELAY_TOGGLE;

/// Debounce time after an edge
const DEBOUNCE_MS: u64 = 30;

/// Button task
///
/// Each press toggles the relay. `inverted` buttons are active-low.
#[embassy_executor::task]
pub async fn button_task(mut input: Input<'static>, inverted: bool) {
    info!("Button task started");

    loop {
        if inverted {
            input.wait_for_falling_edge().await;
        } else {
            input.wait_for_rising_edge().await;
        }
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;

        let pressed = input.is_high() != inverted;
        if pressed {
            debug!("Button pressed");
            RELAY_TOGGLE.signal(());
        }
    }
}
