//! Inter-task communication
//!
//! Statics shared between Embassy tasks. The pin registry lives here too so
//! every task sees the same ownership table.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use pinguard_core::SharedPinRegistry;
use pinguard_hal::Rp2040;

/// Pin and PWM channel ownership for the whole firmware
pub static REGISTRY: SharedPinRegistry<CriticalSectionRawMutex, Rp2040> =
    SharedPinRegistry::new(Rp2040);

/// Relay toggle request (sent by the button task)
pub static RELAY_TOGGLE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Request an immediate usage report
pub static REPORT_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();
