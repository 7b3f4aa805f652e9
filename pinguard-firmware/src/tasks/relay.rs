//! Relay output

use defmt::*;
use embassy_rp::gpio::{Level, Output};

use crate::channels::{RELAY_TOGGLE, REPORT_REQUEST};

/// Relay task
///
/// Starts with the relay off and flips it on every toggle request.
/// `inverted` relays are driven active-low.
#[embassy_executor::task]
pub async fn relay_task(mut output: Output<'static>, inverted: bool) {
    info!("Relay task started (inverted={})", inverted);

    let mut on = false;
    output.set_level(relay_level(on, inverted));

    loop {
        RELAY_TOGGLE.wait().await;
        on = !on;
        output.set_level(relay_level(on, inverted));
        info!("Relay {}", if on { "on" } else { "off" });
        REPORT_REQUEST.signal(());
    }
}

fn relay_level(on: bool, inverted: bool) -> Level {
    if on != inverted {
        Level::High
    } else {
        Level::Low
    }
}
