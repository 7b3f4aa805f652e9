//! Registry error types

use core::fmt;

use crate::owner::PinOwner;

/// Why a pin request or release was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number is not below the platform's pin count
    OutOfRange(u8),
    /// Pin does not exist on this chip
    Unavailable(u8),
    /// Pin reserved for a special function (flash, PSRAM)
    Reserved(u8),
    /// Output requested on an input-only pin
    InputOnly(u8),
    /// Pin already held by another owner
    Owned { pin: u8, owner: PinOwner },
    /// Release of a pin that is not allocated
    NotAllocated(u8),
    /// Release by a subsystem that does not hold the pin
    NotOwner { pin: u8, owner: PinOwner },
    /// Caller passed [`PinOwner::None`]
    NoOwner,
    /// Same pin requested twice in one group with different directions
    DirectionConflict(u8),
}

impl PinError {
    /// Pin the error refers to, if any
    pub const fn pin(&self) -> Option<u8> {
        match *self {
            PinError::OutOfRange(pin)
            | PinError::Unavailable(pin)
            | PinError::Reserved(pin)
            | PinError::InputOnly(pin)
            | PinError::NotAllocated(pin)
            | PinError::DirectionConflict(pin)
            | PinError::Owned { pin, .. }
            | PinError::NotOwner { pin, .. } => Some(pin),
            PinError::NoOwner => None,
        }
    }

    /// Check if the request itself is invalid (as opposed to a conflict)
    pub const fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            PinError::OutOfRange(_)
                | PinError::Unavailable(_)
                | PinError::Reserved(_)
                | PinError::InputOnly(_)
                | PinError::NoOwner
                | PinError::DirectionConflict(_)
        )
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::OutOfRange(pin) => write!(f, "gpio{} is out of range", pin),
            PinError::Unavailable(pin) => write!(f, "gpio{} does not exist on this chip", pin),
            PinError::Reserved(pin) => write!(f, "gpio{} is reserved", pin),
            PinError::InputOnly(pin) => write!(f, "gpio{} is input only", pin),
            PinError::Owned { pin, owner } => {
                write!(f, "gpio{} is already used by {:?}", pin, owner)
            }
            PinError::NotAllocated(pin) => write!(f, "gpio{} is not allocated", pin),
            PinError::NotOwner { pin, owner } => {
                write!(f, "gpio{} belongs to {:?}", pin, owner)
            }
            PinError::NoOwner => f.write_str("no owner given"),
            PinError::DirectionConflict(pin) => {
                write!(f, "gpio{} requested as both input and output", pin)
            }
        }
    }
}

/// Why a channel request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Requested count is zero or larger than the pool
    InvalidCount(u8),
    /// Not enough consecutive free channels
    Exhausted,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::InvalidCount(count) => write!(f, "invalid channel count {}", count),
            ChannelError::Exhausted => f.write_str("no free channels"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_error_pin() {
        assert_eq!(PinError::InputOnly(36).pin(), Some(36));
        assert_eq!(
            PinError::NotOwner {
                pin: 4,
                owner: PinOwner::Relay
            }
            .pin(),
            Some(4)
        );
        assert_eq!(PinError::NoOwner.pin(), None);
    }

    #[test]
    fn test_invalid_request_vs_conflict() {
        // Fixing the request can help
        assert!(PinError::OutOfRange(64).is_invalid_request());
        assert!(PinError::Reserved(6).is_invalid_request());
        assert!(PinError::DirectionConflict(3).is_invalid_request());
        assert!(PinError::NoOwner.is_invalid_request());

        // Someone else holds the pin, or the release was wrong
        assert!(!PinError::Owned {
            pin: 2,
            owner: PinOwner::Button
        }
        .is_invalid_request());
        assert!(!PinError::NotAllocated(2).is_invalid_request());
    }
}
