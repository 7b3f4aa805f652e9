//! GPIO hand-out gated by the pin registry
//!
//! Pins are configured by number in board.toml, so the HAL peripherals are
//! held in a bank and handed out by number. A pin only leaves the bank for
//! the owner the registry has it recorded under.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

use pinguard_core::{PinError, PinOwner, PinPlatform};
use pinguard_hal::Rp2040;

use crate::channels::REGISTRY;

const BANK_SIZE: usize = Rp2040::PIN_COUNT as usize;

/// Build a `PinBank` from the `Peripherals` GPIO fields
macro_rules! pin_bank {
    ($p:expr, $($n:ident),+ $(,)?) => {
        $crate::pins::PinBank::new([$(embassy_rp::Peri::<'static, embassy_rp::gpio::AnyPin>::from($p.$n)),+])
    };
}
pub(crate) use pin_bank;

/// Error when taking a pin from the bank
#[derive(Debug, Clone, Copy)]
#[derive(defmt::Format)]
pub enum TakeError {
    /// Registry refused the hand-out
    Registry(PinError),
    /// Pin already handed out
    AlreadyTaken(u8),
}

impl From<PinError> for TakeError {
    fn from(e: PinError) -> Self {
        Self::Registry(e)
    }
}

/// Bank of all GPIO pins, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; BANK_SIZE],
}

impl PinBank {
    pub fn new(pins: [Peri<'static, AnyPin>; BANK_SIZE]) -> Self {
        Self {
            pins: pins.map(Some),
        }
    }

    /// Take a pin on behalf of `owner`
    ///
    /// The pin must already be allocated to `owner` in the registry.
    pub fn take(&mut self, pin: u8, owner: PinOwner) -> Result<Peri<'static, AnyPin>, TakeError> {
        if pin >= Rp2040::PIN_COUNT {
            return Err(PinError::OutOfRange(pin).into());
        }
        if owner.is_none() {
            return Err(PinError::NoOwner.into());
        }
        if !REGISTRY.is_pin_allocated(pin) {
            return Err(PinError::NotAllocated(pin).into());
        }
        let current = REGISTRY.current_pin_owner(pin);
        if current != owner {
            return Err(PinError::NotOwner {
                pin,
                owner: current,
            }
            .into());
        }
        self.pins[pin as usize]
            .take()
            .ok_or(TakeError::AlreadyTaken(pin))
    }

    /// Return a pin to the bank
    pub fn give_back(&mut self, pin: u8, peri: Peri<'static, AnyPin>) {
        if let Some(slot) = self.pins.get_mut(pin as usize) {
            *slot = Some(peri);
        }
    }
}
