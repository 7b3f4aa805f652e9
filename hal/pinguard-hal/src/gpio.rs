//! GPIO line descriptions
//!
//! Describes what a physical line is able to do, independent of who
//! is currently using it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Requested direction of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinDirection {
    /// Line is read by the subsystem
    Input,
    /// Line is driven by the subsystem
    #[default]
    Output,
}

impl PinDirection {
    /// Check if this direction drives the line
    pub const fn is_output(self) -> bool {
        matches!(self, PinDirection::Output)
    }

    /// Parse a direction name from configuration ("in"/"input", "out"/"output")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "in" | "input" => Some(PinDirection::Input),
            "out" | "output" => Some(PinDirection::Output),
            _ => None,
        }
    }
}

/// Static capability of a GPIO line on a given chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinCapability {
    /// Line does not exist or is not bonded out
    Unavailable,
    /// Line exists but is wired to a special function (flash, PSRAM)
    Reserved,
    /// Line can only be read (no output driver)
    InputOnly,
    /// General purpose line
    InputOutput,
}

impl PinCapability {
    /// Check if a line with this capability can be used in `direction`
    pub const fn supports(self, direction: PinDirection) -> bool {
        match self {
            PinCapability::InputOutput => true,
            PinCapability::InputOnly => !direction.is_output(),
            PinCapability::Unavailable | PinCapability::Reserved => false,
        }
    }
}
