//! Registry shared between execution contexts
//!
//! Wraps a [`PinRegistry`] in an `embassy-sync` blocking mutex so every
//! operation, including the validate-then-commit of a group, runs in one
//! lock section. Use `CriticalSectionRawMutex` when interrupts or a second
//! core touch the registry, `NoopRawMutex` when everything runs in one
//! executor.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use pinguard_hal::{PinDirection, PinPlatform};

use crate::error::{ChannelError, PinError};
use crate::owner::PinOwner;
use crate::registry::{ChannelBlock, PinRegistry, PinRequest};

/// Mutex-guarded pin registry
pub struct SharedPinRegistry<M: RawMutex, P: PinPlatform> {
    inner: Mutex<M, RefCell<PinRegistry<P>>>,
}

impl<M: RawMutex, P: PinPlatform> SharedPinRegistry<M, P> {
    /// Create a shared registry with every pin and channel free
    pub const fn new(platform: P) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(PinRegistry::new(platform))),
        }
    }

    /// Run `f` with exclusive access to the registry
    ///
    /// Use this to combine several operations into one atomic step, e.g.
    /// claiming a pin together with a PWM channel. `f` must not call back
    /// into the same shared registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut PinRegistry<P>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`PinRegistry::allocate_pin`]
    pub fn allocate_pin(
        &self,
        pin: u8,
        direction: PinDirection,
        owner: PinOwner,
    ) -> Result<(), PinError> {
        self.with(|registry| registry.allocate_pin(pin, direction, owner))
    }

    /// See [`PinRegistry::deallocate_pin`]
    pub fn deallocate_pin(&self, pin: u8, owner: PinOwner) -> Result<(), PinError> {
        self.with(|registry| registry.deallocate_pin(pin, owner))
    }

    /// See [`PinRegistry::allocate_pins`]
    pub fn allocate_pins(&self, requests: &[PinRequest], owner: PinOwner) -> Result<(), PinError> {
        self.with(|registry| registry.allocate_pins(requests, owner))
    }

    /// See [`PinRegistry::deallocate_pins`]
    pub fn deallocate_pins(&self, pins: &[u8], owner: PinOwner) -> Result<(), PinError> {
        self.with(|registry| registry.deallocate_pins(pins, owner))
    }

    /// See [`PinRegistry::release_owner`]
    pub fn release_owner(&self, owner: PinOwner) -> usize {
        self.with(|registry| registry.release_owner(owner))
    }

    /// See [`PinRegistry::is_pin_allocated`]
    pub fn is_pin_allocated(&self, pin: u8) -> bool {
        self.with(|registry| registry.is_pin_allocated(pin))
    }

    /// See [`PinRegistry::is_pin_allocated_to`]
    pub fn is_pin_allocated_to(&self, pin: u8, owner: PinOwner) -> bool {
        self.with(|registry| registry.is_pin_allocated_to(pin, owner))
    }

    /// See [`PinRegistry::current_pin_owner`]
    pub fn current_pin_owner(&self, pin: u8) -> PinOwner {
        self.with(|registry| registry.current_pin_owner(pin))
    }

    /// See [`PinRegistry::is_pin_ok`]
    pub fn is_pin_ok(&self, pin: u8, direction: PinDirection) -> bool {
        self.with(|registry| registry.is_pin_ok(pin, direction))
    }

    /// See [`PinRegistry::allocate_channels`]
    pub fn allocate_channels(&self, count: u8) -> Result<ChannelBlock, ChannelError> {
        self.with(|registry| registry.allocate_channels(count))
    }

    /// See [`PinRegistry::deallocate_channels`]
    pub fn deallocate_channels(&self, start: u8, count: u8) {
        self.with(|registry| registry.deallocate_channels(start, count))
    }
}
