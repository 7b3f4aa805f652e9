//! Pinguard Hardware Abstraction Layer
//!
//! This crate describes the physical resources of a chip: how many GPIO
//! lines it has, which of them may be driven or read, and how many
//! auxiliary PWM/timer channels exist. The ownership registry in
//! `pinguard-core` is generic over these descriptions, so the same
//! arbitration logic runs on every supported chip.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Firmware / drivers (callers)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinguard-core (PinRegistry<P>)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinguard-hal (this crate - platforms)  │
//! └─────────────────────────────────────────┘
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!     ┌───────┐   ┌─────────┐  ┌────────┐
//!     │ ESP32 │   │ ESP8266 │  │ RP2040 │
//!     └───────┘   └─────────┘  └────────┘
//! ```
//!
//! # Types
//!
//! - [`gpio::PinDirection`], [`gpio::PinCapability`] - What a line can do
//! - [`platform::PinPlatform`] - Pin/channel counts and the validity predicate
//! - [`esp32::Esp32`], [`esp8266::Esp8266`], [`rp2040::Rp2040`] - Chip tables

#![no_std]
#![deny(unsafe_code)]

pub mod esp32;
pub mod esp8266;
pub mod gpio;
pub mod platform;
pub mod rp2040;

// Re-export key types at crate root for convenience
pub use esp32::Esp32;
pub use esp8266::Esp8266;
pub use gpio::{PinCapability, PinDirection};
pub use platform::PinPlatform;
pub use rp2040::Rp2040;
