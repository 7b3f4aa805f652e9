//! ESP32 pin table
//!
//! - GPIO0..GPIO39, with 20, 24 and 28-31 not bonded out
//! - GPIO6..GPIO11 wired to the SPI flash
//! - GPIO16/GPIO17 wired to PSRAM on WROVER modules
//! - GPIO34..GPIO39 input only
//! - 16 LEDC PWM channels

use crate::gpio::PinCapability;
use crate::platform::PinPlatform;

/// ESP32 (original dual-core part)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Esp32 {
    psram: bool,
}

impl Esp32 {
    /// ESP32 module without PSRAM
    pub const fn new() -> Self {
        Self { psram: false }
    }

    /// ESP32 module with PSRAM on GPIO16/GPIO17
    pub const fn with_psram() -> Self {
        Self { psram: true }
    }
}

impl PinPlatform for Esp32 {
    const PIN_COUNT: u8 = 40;
    const CHANNEL_COUNT: u8 = 16;

    fn name(&self) -> &'static str {
        if self.psram {
            "esp32-psram"
        } else {
            "esp32"
        }
    }

    fn capability(&self, pin: u8) -> PinCapability {
        match pin {
            20 | 24 | 28..=31 => PinCapability::Unavailable,
            6..=11 => PinCapability::Reserved,
            16 | 17 if self.psram => PinCapability::Reserved,
            34..=39 => PinCapability::InputOnly,
            0..=33 => PinCapability::InputOutput,
            _ => PinCapability::Unavailable,
        }
    }
}
