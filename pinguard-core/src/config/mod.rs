//! Configuration types
//!
//! Pin assignments come from user configuration, so they are validated
//! against the platform before any subsystem tries to claim them.

pub mod map;
pub mod pin;

pub use map::{
    ChannelGrants, ConfigError, PinAssignment, PinMap, MAX_ASSIGNMENTS, MAX_GROUP_PINS,
};
pub use pin::{parse_pin_string, PinConfig};
