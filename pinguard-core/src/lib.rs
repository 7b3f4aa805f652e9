//! Pin and channel ownership registry
//!
//! Subsystems compiled into the same firmware pick their pins from
//! configuration and know nothing about each other. This crate is the
//! single arbiter they all go through:
//!
//! - Which subsystem owns each GPIO line ([`registry::PinRegistry`])
//! - All-or-nothing claims for multi-pin peripherals
//! - A small pool of PWM/timer channels
//! - Validation of user pin configuration before anything is claimed
//! - Usage snapshots for status pages
//! - A mutex-guarded variant for multi-context firmware
//!
//! The registry never logs and never touches hardware; every outcome is a
//! return value.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod owner;
pub mod registry;
pub mod report;
pub mod shared;

pub use error::{ChannelError, PinError};
pub use owner::{PinOwner, PluginId};
pub use pinguard_hal::{PinCapability, PinDirection, PinPlatform};
pub use registry::{ChannelBlock, PinRegistry, PinRequest};
pub use shared::SharedPinRegistry;
