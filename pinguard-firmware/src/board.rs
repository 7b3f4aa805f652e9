//! Board pin table
//!
//! The table is generated from board.toml by build.rs and validated there,
//! so `pin_map()` only fails if the registry was already modified.

use pinguard_core::config::{ConfigError, PinAssignment, PinConfig, PinMap};
use pinguard_core::{PinDirection, PinOwner, PinRequest};

include!(concat!(env!("OUT_DIR"), "/board_pins.rs"));

/// Build the pin map from the generated table
pub fn pin_map() -> Result<PinMap, ConfigError> {
    let mut map = PinMap::new();
    for &(owner, channels, pins) in PIN_ASSIGNMENTS {
        let owner = PinOwner::from_u8(owner).ok_or(ConfigError::NoOwner)?;
        let mut assignment = PinAssignment::new(owner).with_channels(channels);
        for &(pin, output, _, _) in pins {
            let direction = if output {
                PinDirection::Output
            } else {
                PinDirection::Input
            };
            assignment.push(PinRequest::new(pin, direction))?;
        }
        map.push(assignment)?;
    }
    Ok(map)
}

/// Get the `index`th configured pin of `owner`
pub fn pin(owner: PinOwner, index: usize) -> Option<PinConfig> {
    let (_, _, pins) = PIN_ASSIGNMENTS
        .iter()
        .find(|(o, _, _)| *o == owner.to_u8())?;
    let &(pin, _, inverted, pull_up) = pins.get(index)?;
    Some(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}
