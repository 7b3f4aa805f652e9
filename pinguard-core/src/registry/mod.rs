//! Pin ownership registry
//!
//! Tracks, for every GPIO line of a platform, whether it is free and which
//! subsystem holds it. Subsystems never learn about each other; they ask
//! the registry and get a yes/no with a reason.
//!
//! Invariants:
//! - a free pin always carries [`PinOwner::None`]
//! - an allocated pin never carries [`PinOwner::None`]
//! - grouped requests are committed whole or not at all

pub mod channels;
pub mod request;

pub use channels::ChannelBlock;
pub use request::PinRequest;

use pinguard_hal::{PinCapability, PinDirection, PinPlatform};

use crate::error::PinError;
use crate::owner::PinOwner;

/// Largest pin count a registry can track
pub const MAX_PINS: usize = 64;

/// Largest channel count a registry can track
pub const MAX_CHANNELS: usize = 32;

/// Pin and channel ownership registry for platform `P`
///
/// Created once by the firmware's composition root and handed to every
/// subsystem that needs pins. Mutation requires `&mut self`; use
/// [`SharedPinRegistry`](crate::shared::SharedPinRegistry) when several
/// execution contexts need access.
#[derive(Debug, Clone)]
pub struct PinRegistry<P: PinPlatform> {
    platform: P,
    /// One bit per pin, set = allocated
    allocated: u64,
    /// Owner tag per pin
    owners: [PinOwner; MAX_PINS],
    /// One bit per auxiliary channel, set = allocated
    channels: u32,
}

impl<P: PinPlatform + Default> Default for PinRegistry<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: PinPlatform> PinRegistry<P> {
    const POOLS_FIT: () = assert!(
        P::PIN_COUNT as usize <= MAX_PINS && P::CHANNEL_COUNT as usize <= MAX_CHANNELS,
        "platform has more pins or channels than a registry can track"
    );

    /// Create a registry with every pin and channel free
    pub const fn new(platform: P) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::POOLS_FIT;
        Self {
            platform,
            allocated: 0,
            owners: [PinOwner::None; MAX_PINS],
            channels: 0,
        }
    }

    /// Platform this registry arbitrates
    pub fn platform(&self) -> &P {
        &self.platform
    }

    const fn bit(pin: u8) -> u64 {
        1u64 << pin
    }

    // ---------------------------------------------------------------
    // Validity
    // ---------------------------------------------------------------

    /// Check if `pin` may be used in `direction`, with the reason if not
    ///
    /// Pure: ignores current allocation state.
    pub fn check_pin(&self, pin: u8, direction: PinDirection) -> Result<(), PinError> {
        if pin >= P::PIN_COUNT {
            return Err(PinError::OutOfRange(pin));
        }
        match self.platform.capability(pin) {
            PinCapability::Unavailable => Err(PinError::Unavailable(pin)),
            PinCapability::Reserved => Err(PinError::Reserved(pin)),
            PinCapability::InputOnly if direction.is_output() => Err(PinError::InputOnly(pin)),
            PinCapability::InputOnly | PinCapability::InputOutput => Ok(()),
        }
    }

    /// Check if `pin` may be used in `direction`
    pub fn is_pin_ok(&self, pin: u8, direction: PinDirection) -> bool {
        self.check_pin(pin, direction).is_ok()
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Check if `pin` is allocated to anyone
    pub fn is_pin_allocated(&self, pin: u8) -> bool {
        pin < P::PIN_COUNT && self.allocated & Self::bit(pin) != 0
    }

    /// Check if `pin` is allocated to `owner`
    ///
    /// Always false for [`PinOwner::None`], since no allocated pin
    /// carries that tag.
    pub fn is_pin_allocated_to(&self, pin: u8, owner: PinOwner) -> bool {
        self.is_pin_allocated(pin) && self.owners[pin as usize] == owner
    }

    /// Owner of `pin`, or [`PinOwner::None`] if free or out of range
    pub fn current_pin_owner(&self, pin: u8) -> PinOwner {
        if pin < P::PIN_COUNT {
            self.owners[pin as usize]
        } else {
            PinOwner::None
        }
    }

    /// Number of allocated pins
    pub fn allocated_count(&self) -> usize {
        self.allocated.count_ones() as usize
    }

    /// Allocated pins with their owners, in pin order
    pub fn allocated_pins(&self) -> impl Iterator<Item = (u8, PinOwner)> + '_ {
        (0..P::PIN_COUNT)
            .filter(move |&pin| self.is_pin_allocated(pin))
            .map(move |pin| (pin, self.owners[pin as usize]))
    }

    /// Pins held by `owner`, in pin order
    pub fn pins_owned_by(&self, owner: PinOwner) -> impl Iterator<Item = u8> + '_ {
        (0..P::PIN_COUNT).filter(move |&pin| self.is_pin_allocated_to(pin, owner))
    }

    // ---------------------------------------------------------------
    // Single pin
    // ---------------------------------------------------------------

    /// Check that `owner` could claim `pin` right now
    fn check_claim(
        &self,
        pin: u8,
        direction: PinDirection,
        owner: PinOwner,
    ) -> Result<(), PinError> {
        self.check_pin(pin, direction)?;
        if self.is_pin_allocated(pin) {
            let current = self.owners[pin as usize];
            if current != owner {
                return Err(PinError::Owned {
                    pin,
                    owner: current,
                });
            }
        }
        Ok(())
    }

    /// Check that `owner` could release `pin` right now
    fn check_release(&self, pin: u8, owner: PinOwner) -> Result<(), PinError> {
        if pin >= P::PIN_COUNT {
            return Err(PinError::OutOfRange(pin));
        }
        if !self.is_pin_allocated(pin) {
            return Err(PinError::NotAllocated(pin));
        }
        let current = self.owners[pin as usize];
        if current != owner {
            return Err(PinError::NotOwner {
                pin,
                owner: current,
            });
        }
        Ok(())
    }

    fn commit(&mut self, pin: u8, owner: PinOwner) {
        self.allocated |= Self::bit(pin);
        self.owners[pin as usize] = owner;
    }

    fn clear(&mut self, pin: u8) {
        self.allocated &= !Self::bit(pin);
        self.owners[pin as usize] = PinOwner::None;
    }

    /// Allocate `pin` to `owner`
    ///
    /// Re-allocating a pin the owner already holds succeeds without
    /// change. The registry is untouched on failure.
    pub fn allocate_pin(
        &mut self,
        pin: u8,
        direction: PinDirection,
        owner: PinOwner,
    ) -> Result<(), PinError> {
        if owner.is_none() {
            return Err(PinError::NoOwner);
        }
        self.check_claim(pin, direction, owner)?;
        self.commit(pin, owner);
        Ok(())
    }

    /// Release `pin`, which must be held by `owner`
    pub fn deallocate_pin(&mut self, pin: u8, owner: PinOwner) -> Result<(), PinError> {
        self.check_release(pin, owner)?;
        self.clear(pin);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------

    /// Allocate every pin in `requests` to `owner`, or none of them
    ///
    /// All requests are validated before anything is written. Listing a
    /// pin twice with the same direction is harmless; listing it with
    /// two different directions is a [`PinError::DirectionConflict`].
    /// Returns the error of the first failing request.
    pub fn allocate_pins(
        &mut self,
        requests: &[PinRequest],
        owner: PinOwner,
    ) -> Result<(), PinError> {
        self.check_pins(requests, owner)?;
        for request in requests {
            self.commit(request.pin, owner);
        }
        Ok(())
    }

    /// Check that [`allocate_pins`](Self::allocate_pins) would succeed
    ///
    /// Dry run for callers that need to validate several groups before
    /// committing any of them.
    pub fn check_pins(&self, requests: &[PinRequest], owner: PinOwner) -> Result<(), PinError> {
        if owner.is_none() {
            return Err(PinError::NoOwner);
        }

        for (i, request) in requests.iter().enumerate() {
            self.check_claim(request.pin, request.direction, owner)?;
            let conflicting = requests[..i]
                .iter()
                .any(|earlier| earlier.pin == request.pin && earlier.direction != request.direction);
            if conflicting {
                return Err(PinError::DirectionConflict(request.pin));
            }
        }
        Ok(())
    }

    /// Release every pin in `pins`, or none of them
    ///
    /// Fails without change if any pin is not held by `owner`.
    pub fn deallocate_pins(&mut self, pins: &[u8], owner: PinOwner) -> Result<(), PinError> {
        for &pin in pins {
            self.check_release(pin, owner)?;
        }
        for &pin in pins {
            self.clear(pin);
        }
        Ok(())
    }

    /// Release every pin held by `owner`
    ///
    /// Returns how many pins were freed.
    pub fn release_owner(&mut self, owner: PinOwner) -> usize {
        if owner.is_none() {
            return 0;
        }
        let mut released = 0;
        for pin in 0..P::PIN_COUNT {
            if self.is_pin_allocated_to(pin, owner) {
                self.clear(pin);
                released += 1;
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::PluginId;
    use pinguard_hal::{Esp32, Esp8266, Rp2040};

    const ENCODER: PinOwner = PinOwner::Plugin(PluginId::ROTARY_ENCODER_UI);

    #[test]
    fn test_new_registry_is_free() {
        let registry = PinRegistry::new(Esp32::new());
        assert_eq!(registry.allocated_count(), 0);
        for pin in 0..40 {
            assert!(!registry.is_pin_allocated(pin));
            assert_eq!(registry.current_pin_owner(pin), PinOwner::None);
        }
    }

    #[test]
    fn test_mutual_exclusion() {
        let mut registry = PinRegistry::new(Esp32::new());

        assert!(registry
            .allocate_pin(4, PinDirection::Output, PinOwner::Relay)
            .is_ok());
        assert_eq!(
            registry.allocate_pin(4, PinDirection::Output, PinOwner::Button),
            Err(PinError::Owned {
                pin: 4,
                owner: PinOwner::Relay
            })
        );
        assert_eq!(registry.current_pin_owner(4), PinOwner::Relay);
    }

    #[test]
    fn test_same_owner_reallocation_is_idempotent() {
        let mut registry = PinRegistry::new(Esp32::new());

        assert!(registry
            .allocate_pin(13, PinDirection::Input, PinOwner::Button)
            .is_ok());
        assert!(registry
            .allocate_pin(13, PinDirection::Input, PinOwner::Button)
            .is_ok());
        assert_eq!(registry.current_pin_owner(13), PinOwner::Button);
        assert_eq!(registry.allocated_count(), 1);
    }

    #[test]
    fn test_release_requires_ownership() {
        let mut registry = PinRegistry::new(Esp32::new());
        registry
            .allocate_pin(2, PinDirection::Output, PinOwner::BusDigital)
            .unwrap();

        assert_eq!(
            registry.deallocate_pin(2, PinOwner::Relay),
            Err(PinError::NotOwner {
                pin: 2,
                owner: PinOwner::BusDigital
            })
        );
        assert!(registry.is_pin_allocated(2));

        assert!(registry.deallocate_pin(2, PinOwner::BusDigital).is_ok());
        assert!(!registry.is_pin_allocated(2));
        assert_eq!(registry.current_pin_owner(2), PinOwner::None);
    }

    #[test]
    fn test_release_free_pin_fails() {
        let mut registry = PinRegistry::new(Esp32::new());
        assert_eq!(
            registry.deallocate_pin(5, PinOwner::Relay),
            Err(PinError::NotAllocated(5))
        );
        assert_eq!(
            registry.deallocate_pin(50, PinOwner::Relay),
            Err(PinError::OutOfRange(50))
        );
    }

    #[test]
    fn test_owner_required() {
        let mut registry = PinRegistry::new(Esp32::new());
        assert_eq!(
            registry.allocate_pin(4, PinDirection::Output, PinOwner::None),
            Err(PinError::NoOwner)
        );
        assert_eq!(
            registry.allocate_pins(&[PinRequest::output(4)], PinOwner::None),
            Err(PinError::NoOwner)
        );
        assert!(!registry.is_pin_allocated(4));
    }

    #[test]
    fn test_validity_gating() {
        let mut registry = PinRegistry::new(Esp32::with_psram());

        assert_eq!(
            registry.allocate_pin(7, PinDirection::Input, PinOwner::Button),
            Err(PinError::Reserved(7))
        );
        assert_eq!(
            registry.allocate_pin(16, PinDirection::Output, PinOwner::Relay),
            Err(PinError::Reserved(16))
        );
        assert_eq!(
            registry.allocate_pin(35, PinDirection::Output, PinOwner::Relay),
            Err(PinError::InputOnly(35))
        );
        assert_eq!(
            registry.allocate_pin(24, PinDirection::Input, PinOwner::Button),
            Err(PinError::Unavailable(24))
        );
        assert_eq!(
            registry.allocate_pin(40, PinDirection::Input, PinOwner::Button),
            Err(PinError::OutOfRange(40))
        );
        assert_eq!(registry.allocated_count(), 0);

        // Input-only pins are fine as inputs
        assert!(registry
            .allocate_pin(35, PinDirection::Input, PinOwner::Button)
            .is_ok());
    }

    #[test]
    fn test_is_pin_ok_ignores_allocation() {
        let mut registry = PinRegistry::new(Esp8266);
        assert!(registry.is_pin_ok(5, PinDirection::Output));
        registry
            .allocate_pin(5, PinDirection::Output, PinOwner::Relay)
            .unwrap();
        assert!(registry.is_pin_ok(5, PinDirection::Output));
        assert!(!registry.is_pin_ok(8, PinDirection::Output));
        assert!(!registry.is_pin_ok(17, PinDirection::Input));
    }

    #[test]
    fn test_allocated_to_specific_owner() {
        let mut registry = PinRegistry::new(Rp2040);
        registry
            .allocate_pin(25, PinDirection::Output, ENCODER)
            .unwrap();

        assert!(registry.is_pin_allocated_to(25, ENCODER));
        assert!(!registry.is_pin_allocated_to(25, PinOwner::Relay));
        assert!(!registry.is_pin_allocated_to(25, PinOwner::None));
        assert!(!registry.is_pin_allocated_to(24, ENCODER));
    }

    #[test]
    fn test_current_owner_out_of_range() {
        let registry = PinRegistry::new(Rp2040);
        assert_eq!(registry.current_pin_owner(30), PinOwner::None);
        assert_eq!(registry.current_pin_owner(255), PinOwner::None);
        assert!(!registry.is_pin_allocated(255));
    }

    #[test]
    fn test_group_all_or_nothing() {
        let mut registry = PinRegistry::new(Esp32::new());
        registry
            .allocate_pin(5, PinDirection::Output, PinOwner::Relay)
            .unwrap();

        let result = registry.allocate_pins(
            &[PinRequest::input(4), PinRequest::input(5)],
            ENCODER,
        );
        assert_eq!(
            result,
            Err(PinError::Owned {
                pin: 5,
                owner: PinOwner::Relay
            })
        );
        assert!(!registry.is_pin_allocated(4));
        assert_eq!(registry.current_pin_owner(5), PinOwner::Relay);
    }

    #[test]
    fn test_group_invalid_member_commits_nothing() {
        let mut registry = PinRegistry::new(Esp32::new());
        let result = registry.allocate_pins(
            &[
                PinRequest::output(18),
                PinRequest::output(19),
                PinRequest::output(36),
            ],
            PinOwner::Ethernet,
        );
        assert_eq!(result, Err(PinError::InputOnly(36)));
        assert_eq!(registry.allocated_count(), 0);
    }

    #[test]
    fn test_group_success() {
        let mut registry = PinRegistry::new(Esp32::new());
        let pins = [
            PinRequest::output(21),
            PinRequest::output(22),
            PinRequest::input(34),
        ];

        assert!(registry.allocate_pins(&pins, ENCODER).is_ok());
        let owned: heapless::Vec<u8, 8> = registry.pins_owned_by(ENCODER).collect();
        assert_eq!(owned.as_slice(), &[21, 22, 34]);

        // Re-registering the same group is accepted
        assert!(registry.allocate_pins(&pins, ENCODER).is_ok());
        assert_eq!(registry.allocated_count(), 3);
    }

    #[test]
    fn test_group_duplicate_pins() {
        let mut registry = PinRegistry::new(Esp32::new());

        assert_eq!(
            registry.allocate_pins(
                &[PinRequest::output(12), PinRequest::input(12)],
                PinOwner::Dmx
            ),
            Err(PinError::DirectionConflict(12))
        );
        assert!(!registry.is_pin_allocated(12));

        assert!(registry
            .allocate_pins(
                &[PinRequest::output(12), PinRequest::output(12)],
                PinOwner::Dmx
            )
            .is_ok());
        assert_eq!(registry.allocated_count(), 1);
    }

    #[test]
    fn test_empty_group() {
        let mut registry = PinRegistry::new(Esp32::new());
        assert!(registry.allocate_pins(&[], PinOwner::Dmx).is_ok());
        assert_eq!(registry.allocated_count(), 0);
    }

    #[test]
    fn test_group_release_all_or_nothing() {
        let mut registry = PinRegistry::new(Esp32::new());
        registry
            .allocate_pins(&[PinRequest::output(21), PinRequest::output(22)], ENCODER)
            .unwrap();
        registry
            .allocate_pin(23, PinDirection::Output, PinOwner::Relay)
            .unwrap();

        assert_eq!(
            registry.deallocate_pins(&[21, 22, 23], ENCODER),
            Err(PinError::NotOwner {
                pin: 23,
                owner: PinOwner::Relay
            })
        );
        assert!(registry.is_pin_allocated_to(21, ENCODER));
        assert!(registry.is_pin_allocated_to(22, ENCODER));

        assert!(registry.deallocate_pins(&[21, 22], ENCODER).is_ok());
        assert_eq!(registry.allocated_count(), 1);
    }

    #[test]
    fn test_release_owner() {
        let mut registry = PinRegistry::new(Rp2040);
        registry
            .allocate_pins(
                &[PinRequest::input(2), PinRequest::input(3), PinRequest::output(4)],
                ENCODER,
            )
            .unwrap();
        registry
            .allocate_pin(10, PinDirection::Output, PinOwner::Relay)
            .unwrap();

        assert_eq!(registry.release_owner(ENCODER), 3);
        assert_eq!(registry.release_owner(ENCODER), 0);
        assert_eq!(registry.release_owner(PinOwner::None), 0);
        assert_eq!(registry.allocated_count(), 1);
        assert_eq!(registry.current_pin_owner(10), PinOwner::Relay);
    }

    #[test]
    fn test_allocated_pins_listing() {
        let mut registry = PinRegistry::new(Rp2040);
        registry
            .allocate_pin(9, PinDirection::Output, PinOwner::BusPwm)
            .unwrap();
        registry
            .allocate_pin(1, PinDirection::Output, PinOwner::DebugOut)
            .unwrap();

        let listing: heapless::Vec<(u8, PinOwner), 4> = registry.allocated_pins().collect();
        assert_eq!(
            listing.as_slice(),
            &[(1, PinOwner::DebugOut), (9, PinOwner::BusPwm)]
        );
    }
}
