//! RP2040 pin table
//!
//! GPIO0..GPIO29, all bidirectional (the QSPI flash lines are not part
//! of the GPIO bank). Eight PWM slices with an A and B output each give
//! 16 PWM channels.

use crate::gpio::PinCapability;
use crate::platform::PinPlatform;

/// RP2040
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rp2040;

impl Rp2040 {
    /// PWM channel index driven by `gpio`
    ///
    /// Channel `2 * slice + b` where slice = (gpio / 2) % 8 and b is the
    /// odd/even output. Useful for callers that need both a pin and the
    /// channel wired to it.
    pub const fn pwm_channel(gpio: u8) -> Option<u8> {
        if gpio < Self::PIN_COUNT {
            Some(((gpio / 2) % 8) * 2 + (gpio % 2))
        } else {
            None
        }
    }
}

impl PinPlatform for Rp2040 {
    const PIN_COUNT: u8 = 30;
    const CHANNEL_COUNT: u8 = 16;

    fn name(&self) -> &'static str {
        "rp2040"
    }

    fn capability(&self, pin: u8) -> PinCapability {
        if pin < Self::PIN_COUNT {
            PinCapability::InputOutput
        } else {
            PinCapability::Unavailable
        }
    }
}
