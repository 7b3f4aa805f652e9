//! ESP8266 pin table
//!
//! GPIO0..GPIO16, with GPIO6..GPIO11 wired to the SPI flash. PWM is
//! software driven on this chip, so there is no channel pool.

use crate::gpio::PinCapability;
use crate::platform::PinPlatform;

/// ESP8266
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Esp8266;

impl PinPlatform for Esp8266 {
    const PIN_COUNT: u8 = 17;
    const CHANNEL_COUNT: u8 = 0;

    fn name(&self) -> &'static str {
        "esp8266"
    }

    fn capability(&self, pin: u8) -> PinCapability {
        match pin {
            6..=11 => PinCapability::Reserved,
            0..=16 => PinCapability::InputOutput,
            _ => PinCapability::Unavailable,
        }
    }
}
