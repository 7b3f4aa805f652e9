//! Rotary encoder plugin

use defmt::*;
use embassy_rp::gpio::Input;

/// Encoder task
///
/// Counts quadrature steps on A and logs the position.
#[embassy_executor::task]
pub async fn encoder_task(mut a: Input<'static>, b: Input<'static>) {
    info!("Encoder task started");

    let mut position: i32 = 0;
    loop {
        a.wait_for_falling_edge().await;
        if b.is_high() {
            position = position.wrapping_add(1);
        } else {
            position = position.wrapping_sub(1);
        }
        debug!("Encoder position {}", position);
    }
}
