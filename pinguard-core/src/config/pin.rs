//! Single pin configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use pinguard_hal::PinDirection;

use super::map::ConfigError;
use crate::registry::PinRequest;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Registry request for this pin
    pub const fn request(&self, direction: PinDirection) -> PinRequest {
        PinRequest::new(self.pin, direction)
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio11" -> pin 11
/// - "!gpio12" -> pin 12, inverted (active-low)
/// - "^gpio4" -> pin 4, pull-up enabled
/// - "11" -> pin 11
/// - "-1", "none", "" -> unassigned (`Ok(None)`)
///
/// Anything else is [`ConfigError::Syntax`]. Range checking against a
/// chip is left to the registry.
pub fn parse_pin_string(s: &str) -> Result<Option<PinConfig>, ConfigError> {
    let s = s.trim();
    if s.is_empty() || s == "-1" || s == "none" {
        return Ok(None);
    }

    let mut config = PinConfig::default();
    let mut rest = s;
    loop {
        if let Some(r) = rest.strip_prefix('!') {
            config.inverted = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('^') {
            config.pull_up = true;
            rest = r;
        } else {
            break;
        }
    }

    let num_str = rest.strip_prefix("gpio").unwrap_or(rest);
    config.pin = num_str.parse().map_err(|_| ConfigError::Syntax)?;
    Ok(Some(config))
}
