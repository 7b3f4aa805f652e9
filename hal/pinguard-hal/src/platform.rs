//! Platform description trait
//!
//! A platform supplies the compile-time size of the pin and channel pools
//! and the predicate deciding whether a line may be used in a direction.

use crate::gpio::{PinCapability, PinDirection};

/// Chip-level pin and channel description
///
/// Implementations are usually zero-sized or carry a few board flags
/// (e.g. whether PSRAM occupies some lines). The registry keeps one
/// instance for its whole lifetime.
pub trait PinPlatform {
    /// Number of GPIO lines, indexed `0..PIN_COUNT`
    const PIN_COUNT: u8;

    /// Number of auxiliary PWM/timer channels, indexed `0..CHANNEL_COUNT`
    const CHANNEL_COUNT: u8;

    /// Short chip name for diagnostics
    fn name(&self) -> &'static str;

    /// Capability of `pin`
    ///
    /// Only called with `pin < PIN_COUNT`.
    fn capability(&self, pin: u8) -> PinCapability;

    /// Check if `pin` exists and can be used in `direction`
    fn supports(&self, pin: u8, direction: PinDirection) -> bool {
        pin < Self::PIN_COUNT && self.capability(pin).supports(direction)
    }
}
