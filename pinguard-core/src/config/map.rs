//! Board pin map
//!
//! A [`PinMap`] lists which owner wants which pins. It is validated as a
//! whole before anything is allocated, so a bad configuration is reported
//! up front instead of leaving some subsystems running and others not.

use core::fmt;

use heapless::Vec;
use pinguard_hal::{PinDirection, PinPlatform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::pin::parse_pin_string;
use crate::error::{ChannelError, PinError};
use crate::owner::PinOwner;
use crate::registry::{ChannelBlock, PinRegistry, PinRequest};

/// Maximum pins in one owner's group
pub const MAX_GROUP_PINS: usize = 12;

/// Maximum owners in one map
pub const MAX_ASSIGNMENTS: usize = 16;

/// Channel blocks handed out by [`PinMap::apply`], tagged with their owner
pub type ChannelGrants = Vec<(PinOwner, ChannelBlock), MAX_ASSIGNMENTS>;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin string could not be parsed
    Syntax,
    /// Group has more than [`MAX_GROUP_PINS`] pins
    TooManyPins,
    /// Map has more than [`MAX_ASSIGNMENTS`] owners
    TooManyAssignments,
    /// Assignment without an owner
    NoOwner,
    /// Same owner listed twice
    DuplicateOwner(PinOwner),
    /// Pin refused for this owner
    Pin { owner: PinOwner, error: PinError },
    /// Channel block refused for this owner
    Channels { owner: PinOwner, error: ChannelError },
    /// Two owners configured on one pin
    Conflict {
        pin: u8,
        first: PinOwner,
        second: PinOwner,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Syntax => f.write_str("invalid pin string"),
            ConfigError::TooManyPins => write!(f, "more than {} pins in one group", MAX_GROUP_PINS),
            ConfigError::TooManyAssignments => {
                write!(f, "more than {} pin assignments", MAX_ASSIGNMENTS)
            }
            ConfigError::NoOwner => f.write_str("pin assignment without owner"),
            ConfigError::DuplicateOwner(owner) => write!(f, "{:?} assigned twice", owner),
            ConfigError::Pin { owner, error } => write!(f, "{:?}: {}", owner, error),
            ConfigError::Channels { owner, error } => write!(f, "{:?}: {}", owner, error),
            ConfigError::Conflict { pin, first, second } => {
                write!(f, "gpio{} configured for both {:?} and {:?}", pin, first, second)
            }
        }
    }
}

/// Pins wanted by one owner
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinAssignment {
    /// Subsystem claiming the pins
    pub owner: PinOwner,
    /// Requested pins, allocated as one group
    pub pins: Vec<PinRequest, MAX_GROUP_PINS>,
    /// Consecutive auxiliary channels wanted, 0 for none
    pub channels: u8,
}

impl PinAssignment {
    /// Create an empty assignment
    pub fn new(owner: PinOwner) -> Self {
        Self {
            owner,
            pins: Vec::new(),
            channels: 0,
        }
    }

    /// Also request a block of `count` channels
    pub fn with_channels(mut self, count: u8) -> Self {
        self.channels = count;
        self
    }

    /// Add a pin to the group
    pub fn push(&mut self, request: PinRequest) -> Result<(), ConfigError> {
        self.pins.push(request).map_err(|_| ConfigError::TooManyPins)
    }

    /// Build from configuration strings
    ///
    /// Unassigned entries ("-1", "none") are skipped, so optional pins of
    /// a peripheral can stay in the config file.
    pub fn from_pin_strings(
        owner: PinOwner,
        pins: &[(&str, PinDirection)],
    ) -> Result<Self, ConfigError> {
        let mut assignment = Self::new(owner);
        for &(s, direction) in pins {
            if let Some(config) = parse_pin_string(s)? {
                assignment.push(config.request(direction))?;
            }
        }
        Ok(assignment)
    }
}

/// All pin assignments of a board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMap {
    /// One entry per owner
    pub assignments: Vec<PinAssignment, MAX_ASSIGNMENTS>,
}

impl PinMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assignment
    pub fn push(&mut self, assignment: PinAssignment) -> Result<(), ConfigError> {
        self.assignments
            .push(assignment)
            .map_err(|_| ConfigError::TooManyAssignments)
    }

    /// Find the assignment of `owner`
    pub fn find(&self, owner: PinOwner) -> Option<&PinAssignment> {
        self.assignments.iter().find(|a| a.owner == owner)
    }

    /// Total number of requested pins
    pub fn pin_count(&self) -> usize {
        self.assignments.iter().map(|a| a.pins.len()).sum()
    }

    /// Check the map against the platform
    ///
    /// Does not look at current allocations and changes nothing. Channel
    /// requests must fit the pool when it is empty.
    pub fn validate<P: PinPlatform>(&self, registry: &PinRegistry<P>) -> Result<(), ConfigError> {
        let mut channels_wanted = 0u32;
        for (i, assignment) in self.assignments.iter().enumerate() {
            let owner = assignment.owner;
            if owner.is_none() {
                return Err(ConfigError::NoOwner);
            }
            if self.assignments[..i].iter().any(|a| a.owner == owner) {
                return Err(ConfigError::DuplicateOwner(owner));
            }

            if assignment.channels > P::CHANNEL_COUNT {
                return Err(ConfigError::Channels {
                    owner,
                    error: ChannelError::InvalidCount(assignment.channels),
                });
            }
            channels_wanted += assignment.channels as u32;
            if channels_wanted > P::CHANNEL_COUNT as u32 {
                return Err(ConfigError::Channels {
                    owner,
                    error: ChannelError::Exhausted,
                });
            }

            for (j, request) in assignment.pins.iter().enumerate() {
                registry
                    .check_pin(request.pin, request.direction)
                    .map_err(|error| ConfigError::Pin { owner, error })?;

                let conflicting = assignment.pins[..j]
                    .iter()
                    .any(|r| r.pin == request.pin && r.direction != request.direction);
                if conflicting {
                    return Err(ConfigError::Pin {
                        owner,
                        error: PinError::DirectionConflict(request.pin),
                    });
                }

                let earlier = self.assignments[..i]
                    .iter()
                    .find(|a| a.pins.iter().any(|r| r.pin == request.pin));
                if let Some(first) = earlier {
                    return Err(ConfigError::Conflict {
                        pin: request.pin,
                        first: first.owner,
                        second: owner,
                    });
                }
            }
        }
        Ok(())
    }

    /// Allocate every assignment, pins and channels, or none of them
    ///
    /// The map is validated and every group is checked against the
    /// registry's current state before the first pin is committed. If a
    /// channel block cannot be found, blocks taken so far are returned to
    /// the pool and no pin is allocated.
    pub fn apply<P: PinPlatform>(
        &self,
        registry: &mut PinRegistry<P>,
    ) -> Result<ChannelGrants, ConfigError> {
        self.validate(registry)?;
        for assignment in &self.assignments {
            registry
                .check_pins(&assignment.pins, assignment.owner)
                .map_err(|error| ConfigError::Pin {
                    owner: assignment.owner,
                    error,
                })?;
        }

        let mut grants = ChannelGrants::new();
        for assignment in self.assignments.iter().filter(|a| a.channels > 0) {
            let block = match registry.allocate_channels(assignment.channels) {
                Ok(block) => block,
                Err(error) => {
                    for (_, block) in &grants {
                        registry.release_channels(*block);
                    }
                    return Err(ConfigError::Channels {
                        owner: assignment.owner,
                        error,
                    });
                }
            };
            // One entry per owner, and owners are unique after validate
            let _ = grants.push((assignment.owner, block));
        }

        for assignment in &self.assignments {
            registry
                .allocate_pins(&assignment.pins, assignment.owner)
                .map_err(|error| ConfigError::Pin {
                    owner: assignment.owner,
                    error,
                })?;
        }
        Ok(grants)
    }
}
