//! Pinguard - pin ownership firmware
//!
//! Firmware for RP2040 boards. Every GPIO and PWM channel is claimed
//! through the shared pin registry before a task may drive it; the claims
//! come from board.toml and are checked again at boot.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use {defmt_rtt as _, panic_probe as _};

use pinguard_core::config::{ChannelGrants, ConfigError};
use pinguard_core::{PinOwner, PluginId};

mod board;
mod channels;
mod pins;
mod tasks;

use channels::REGISTRY;
use pins::PinBank;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pinguard firmware starting...");

    let p = embassy_rp::init(Default::default());
    let mut bank = pins::pin_bank!(
        p, PIN_0, PIN_1, PIN_2, PIN_3, PIN_4, PIN_5, PIN_6, PIN_7, PIN_8, PIN_9, PIN_10, PIN_11,
        PIN_12, PIN_13, PIN_14, PIN_15, PIN_16, PIN_17, PIN_18, PIN_19, PIN_20, PIN_21, PIN_22,
        PIN_23, PIN_24, PIN_25, PIN_26, PIN_27, PIN_28, PIN_29,
    );

    info!("Board: {}", board::BOARD_NAME);

    // Claim every configured pin and channel block, all or nothing
    let grants = match claim_board() {
        Ok(grants) => grants,
        Err(e) => {
            report_rejected(&e);
            // Nothing was claimed; keep running so the report shows why
            ChannelGrants::new()
        }
    };

    for (owner, block) in &grants {
        info!(
            "{}: PWM channels {}..{}",
            owner.label(),
            block.start(),
            block.start() + block.count()
        );
    }

    spawn_relay(&spawner, &mut bank);
    spawn_button(&spawner, &mut bank);
    spawn_encoder(&spawner, &mut bank);

    spawner.spawn(tasks::status_task(grants)).unwrap();

    info!("All tasks spawned");

    // Main loop - just keep alive
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Apply the generated pin map to the registry
fn claim_board() -> Result<ChannelGrants, ConfigError> {
    let map = board::pin_map()?;
    let grants = REGISTRY.with(|r| map.apply(r))?;
    info!("Claimed {} pins from board map", map.pin_count());
    Ok(grants)
}

fn report_rejected(e: &ConfigError) {
    error!("Board pin map rejected: {}", e);
    if let ConfigError::Pin { error, .. } = e {
        if error.is_invalid_request() {
            error!("board.toml names a pin this chip can't use");
        } else if let Some(pin) = error.pin() {
            let holder = REGISTRY.current_pin_owner(pin);
            error!("gpio{} is already held by {}", pin, holder.label());
        }
    }
}

fn spawn_relay(spawner: &Spawner, bank: &mut PinBank) {
    let Some(pin) = board::pin(PinOwner::Relay, 0) else {
        return;
    };
    match bank.take(pin.pin, PinOwner::Relay) {
        Ok(peri) => {
            let output = Output::new(peri, Level::Low);
            spawner
                .spawn(tasks::relay_task(output, pin.inverted))
                .unwrap();
        }
        Err(e) => warn!("Relay gpio{} unavailable: {}", pin.pin, e),
    }
}

fn spawn_button(spawner: &Spawner, bank: &mut PinBank) {
    let Some(pin) = board::pin(PinOwner::Button, 0) else {
        return;
    };
    match bank.take(pin.pin, PinOwner::Button) {
        Ok(peri) => {
            let pull = if pin.pull_up { Pull::Up } else { Pull::None };
            let input = Input::new(peri, pull);
            spawner
                .spawn(tasks::button_task(input, pin.pull_up || pin.inverted))
                .unwrap();
        }
        Err(e) => warn!("Button gpio{} unavailable: {}", pin.pin, e),
    }
}

/// Start the encoder plugin, or hand its pins back if it can't run
fn spawn_encoder(spawner: &Spawner, bank: &mut PinBank) {
    let owner = PinOwner::Plugin(PluginId::ROTARY_ENCODER_UI);
    let (Some(a), Some(b)) = (board::pin(owner, 0), board::pin(owner, 1)) else {
        return;
    };

    let a_peri = match bank.take(a.pin, owner) {
        Ok(peri) => peri,
        Err(e) => {
            warn!("Encoder gpio{} unavailable: {}", a.pin, e);
            let released = REGISTRY.release_owner(owner);
            info!("Encoder released {} pins", released);
            return;
        }
    };
    let b_peri = match bank.take(b.pin, owner) {
        Ok(peri) => peri,
        Err(e) => {
            warn!("Encoder gpio{} unavailable: {}", b.pin, e);
            bank.give_back(a.pin, a_peri);
            let released = REGISTRY.release_owner(owner);
            info!("Encoder released {} pins", released);
            return;
        }
    };

    let pull = |pull_up: bool| if pull_up { Pull::Up } else { Pull::None };
    let a_in = Input::new(a_peri, pull(a.pull_up));
    let b_in = Input::new(b_peri, pull(b.pull_up));
    spawner.spawn(tasks::encoder_task(a_in, b_in)).unwrap();
}
