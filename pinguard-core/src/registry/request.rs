//! Managed pin requests

use pinguard_hal::PinDirection;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One pin of an allocation request
///
/// Only describes what a caller wants; the registry never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinRequest {
    /// GPIO number
    pub pin: u8,
    /// Direction the caller will use the pin in
    pub direction: PinDirection,
}

impl PinRequest {
    /// Create a new request
    pub const fn new(pin: u8, direction: PinDirection) -> Self {
        Self { pin, direction }
    }

    /// Request a pin to drive
    pub const fn output(pin: u8) -> Self {
        Self::new(pin, PinDirection::Output)
    }

    /// Request a pin to read
    pub const fn input(pin: u8) -> Self {
        Self::new(pin, PinDirection::Input)
    }
}

