//! Pin usage snapshot
//!
//! Read-only view of the registry for status pages and debug output.
//! A report is captured in one go, so it is consistent even if the
//! registry changes afterwards.

use core::fmt;

use heapless::{String, Vec};
use pinguard_hal::{PinCapability, PinPlatform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::owner::PinOwner;
use crate::registry::{PinRegistry, MAX_PINS};

/// Maximum length of the platform name in a report
pub const MAX_PLATFORM_NAME: usize = 16;

/// One allocated pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinUsage {
    /// GPIO number
    pub pin: u8,
    /// Current owner
    pub owner: PinOwner,
    /// What the line can do on this chip
    pub capability: PinCapability,
}

/// Snapshot of all allocations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsageReport {
    /// Chip name
    pub platform: String<MAX_PLATFORM_NAME>,
    /// Total GPIO lines on the chip
    pub pin_count: u8,
    /// Allocated pins in pin order
    pub pins: Vec<PinUsage, MAX_PINS>,
    /// Total auxiliary channels on the chip
    pub channel_count: u8,
    /// Allocated channels, bit `n` = channel `n`
    pub channels: u32,
}

impl UsageReport {
    /// Capture the current state of `registry`
    pub fn capture<P: PinPlatform>(registry: &PinRegistry<P>) -> Self {
        let platform = registry.platform();

        let mut name = String::new();
        for c in platform.name().chars() {
            if name.push(c).is_err() {
                break;
            }
        }

        let mut pins = Vec::new();
        for (pin, owner) in registry.allocated_pins() {
            // Cannot overflow: the registry tracks at most MAX_PINS pins
            let _ = pins.push(PinUsage {
                pin,
                owner,
                capability: platform.capability(pin),
            });
        }

        let channels = (0..P::CHANNEL_COUNT)
            .filter(|&index| registry.is_channel_allocated(index))
            .fold(0u32, |mask, index| mask | (1 << index));

        Self {
            platform: name,
            pin_count: P::PIN_COUNT,
            pins,
            channel_count: P::CHANNEL_COUNT,
            channels,
        }
    }

    /// Owner of `pin` at capture time
    pub fn owner_of(&self, pin: u8) -> PinOwner {
        self.pins
            .iter()
            .find(|usage| usage.pin == pin)
            .map(|usage| usage.owner)
            .unwrap_or(PinOwner::None)
    }

    /// Number of channels in use at capture time
    pub fn channels_used(&self) -> u8 {
        self.channels.count_ones() as u8
    }

    /// Encode with postcard into `buf`
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Decode a report produced by [`encode`](Self::encode)
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} pins, {}/{} channels",
            self.platform,
            self.pins.len(),
            self.pin_count,
            self.channels_used(),
            self.channel_count
        )?;
        for usage in &self.pins {
            let input_only = if usage.capability == PinCapability::InputOnly {
                " (in)"
            } else {
                ""
            };
            match usage.owner {
                PinOwner::Plugin(id) => writeln!(
                    f,
                    "  gpio{:<2} {}{:02x}{}",
                    usage.pin,
                    usage.owner.label(),
                    id.get(),
                    input_only
                )?,
                owner => writeln!(f, "  gpio{:<2} {}{}", usage.pin, owner.label(), input_only)?,
            }
        }
        Ok(())
    }
}
