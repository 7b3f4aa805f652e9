//! Randomized operation sequences against the registry
//!
//! Every sequence is replayed against a plain array model; after each
//! step the registry must agree with the model and keep its invariants.

use pinguard_core::{
    ChannelError, PinDirection, PinOwner, PinPlatform, PinRegistry, PinRequest, PluginId,
};
use pinguard_hal::Esp32;
use proptest::prelude::*;

const PIN_SPACE: u8 = 44;

#[derive(Debug, Clone)]
enum Op {
    Allocate(u8, PinDirection, PinOwner),
    Deallocate(u8, PinOwner),
    AllocateGroup(Vec<PinRequest>, PinOwner),
    DeallocateGroup(Vec<u8>, PinOwner),
    ReleaseOwner(PinOwner),
    AllocateChannels(u8),
    DeallocateChannels(u8, u8),
}

fn owner() -> impl Strategy<Value = PinOwner> {
    prop_oneof![
        Just(PinOwner::None),
        Just(PinOwner::Relay),
        Just(PinOwner::Button),
        Just(PinOwner::BusDigital),
        Just(PinOwner::Plugin(PluginId::TEMPERATURE)),
    ]
}

fn direction() -> impl Strategy<Value = PinDirection> {
    prop_oneof![Just(PinDirection::Input), Just(PinDirection::Output)]
}

fn request() -> impl Strategy<Value = PinRequest> {
    (0..PIN_SPACE, direction()).prop_map(|(pin, dir)| PinRequest::new(pin, dir))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..PIN_SPACE, direction(), owner()).prop_map(|(p, d, o)| Op::Allocate(p, d, o)),
        3 => (0..PIN_SPACE, owner()).prop_map(|(p, o)| Op::Deallocate(p, o)),
        2 => (prop::collection::vec(request(), 0..5), owner())
            .prop_map(|(r, o)| Op::AllocateGroup(r, o)),
        1 => (prop::collection::vec(0..PIN_SPACE, 0..4), owner())
            .prop_map(|(p, o)| Op::DeallocateGroup(p, o)),
        1 => owner().prop_map(Op::ReleaseOwner),
        2 => (0u8..18).prop_map(Op::AllocateChannels),
        1 => (0u8..20, 0u8..6).prop_map(|(s, c)| Op::DeallocateChannels(s, c)),
    ]
}

struct Model {
    owners: [PinOwner; PIN_SPACE as usize],
    /// One bit per channel, set = allocated
    channels: u32,
}

impl Model {
    fn channel_used(&self, index: u8) -> bool {
        self.channels & (1 << index) != 0
    }

    /// Lowest start of `count` consecutive free channels
    fn first_free_run(&self, count: u8) -> Option<u8> {
        (0..=Esp32::CHANNEL_COUNT.checked_sub(count)?)
            .find(|&start| (start..start + count).all(|i| !self.channel_used(i)))
    }
}

fn claimable(model: &Model, chip: &Esp32, pin: u8, dir: PinDirection, owner: PinOwner) -> bool {
    chip.supports(pin, dir) && {
        let current = model.owners[pin as usize];
        current.is_none() || current == owner
    }
}

fn assert_invariants(registry: &PinRegistry<Esp32>, model: &Model) {
    for pin in 0..PIN_SPACE {
        let owner = registry.current_pin_owner(pin);
        assert_eq!(owner, model.owners[pin as usize], "owner of gpio{}", pin);
        if registry.is_pin_allocated(pin) {
            assert_ne!(owner, PinOwner::None, "allocated gpio{} without owner", pin);
        } else {
            assert_eq!(owner, PinOwner::None, "free gpio{} kept an owner", pin);
        }
    }
    let allocated = (0..PIN_SPACE).filter(|&p| registry.is_pin_allocated(p)).count();
    assert_eq!(allocated, registry.allocated_count());
    for index in 0..Esp32::CHANNEL_COUNT + 2 {
        assert_eq!(
            registry.is_channel_allocated(index),
            index < Esp32::CHANNEL_COUNT && model.channel_used(index),
            "channel {}",
            index
        );
    }
    assert_eq!(
        registry.free_channel_count() as u32,
        Esp32::CHANNEL_COUNT as u32 - model.channels.count_ones()
    );
}

proptest! {
    #[test]
    fn prop_registry_matches_model(ops in prop::collection::vec(op(), 1..60)) {
        let chip = Esp32::new();
        let mut registry = PinRegistry::new(chip);
        let mut model = Model {
            owners: [PinOwner::None; PIN_SPACE as usize],
            channels: 0,
        };

        for op in ops {
            match op {
                Op::Allocate(pin, dir, owner) => {
                    let expected = !owner.is_none() && claimable(&model, &chip, pin, dir, owner);
                    let result = registry.allocate_pin(pin, dir, owner);
                    prop_assert_eq!(result.is_ok(), expected);
                    if expected {
                        model.owners[pin as usize] = owner;
                    }
                }
                Op::Deallocate(pin, owner) => {
                    let expected = pin < Esp32::PIN_COUNT
                        && !owner.is_none()
                        && model.owners[pin as usize] == owner;
                    let result = registry.deallocate_pin(pin, owner);
                    prop_assert_eq!(result.is_ok(), expected);
                    if expected {
                        model.owners[pin as usize] = PinOwner::None;
                    }
                }
                Op::AllocateGroup(requests, owner) => {
                    let conflict = requests.iter().enumerate().any(|(i, r)| {
                        requests[..i].iter().any(|e| e.pin == r.pin && e.direction != r.direction)
                    });
                    let expected = !owner.is_none()
                        && !conflict
                        && requests
                            .iter()
                            .all(|r| claimable(&model, &chip, r.pin, r.direction, owner));
                    let before = registry.allocated_count();
                    let result = registry.allocate_pins(&requests, owner);
                    prop_assert_eq!(result.is_ok(), expected);
                    if expected {
                        for r in &requests {
                            model.owners[r.pin as usize] = owner;
                        }
                    } else {
                        prop_assert_eq!(registry.allocated_count(), before);
                    }
                }
                Op::DeallocateGroup(pins, owner) => {
                    // An empty list succeeds for anyone
                    let expected = pins.iter().all(|&p| {
                        p < Esp32::PIN_COUNT
                            && !owner.is_none()
                            && model.owners[p as usize] == owner
                    });
                    let result = registry.deallocate_pins(&pins, owner);
                    prop_assert_eq!(result.is_ok(), expected);
                    if expected {
                        for &p in &pins {
                            model.owners[p as usize] = PinOwner::None;
                        }
                    }
                }
                Op::ReleaseOwner(owner) => {
                    let held = if owner.is_none() {
                        0
                    } else {
                        model.owners.iter().filter(|&&o| o == owner).count()
                    };
                    prop_assert_eq!(registry.release_owner(owner), held);
                    if !owner.is_none() {
                        for slot in model.owners.iter_mut().filter(|o| **o == owner) {
                            *slot = PinOwner::None;
                        }
                    }
                }
                Op::AllocateChannels(count) => {
                    let valid = count > 0 && count <= Esp32::CHANNEL_COUNT;
                    let expected_start = if valid { model.first_free_run(count) } else { None };
                    match registry.allocate_channels(count) {
                        Ok(block) => {
                            prop_assert_eq!(Some(block.start()), expected_start);
                            prop_assert_eq!(block.count(), count);
                            for index in block.channels() {
                                model.channels |= 1 << index;
                            }
                        }
                        Err(ChannelError::InvalidCount(n)) => {
                            prop_assert_eq!(n, count);
                            prop_assert!(!valid);
                        }
                        Err(ChannelError::Exhausted) => {
                            // No run of `count` free channels anywhere
                            prop_assert!(valid);
                            prop_assert_eq!(expected_start, None);
                        }
                    }
                }
                Op::DeallocateChannels(start, count) => {
                    registry.deallocate_channels(start, count);
                    let end = start.saturating_add(count).min(Esp32::CHANNEL_COUNT);
                    for index in start..end {
                        model.channels &= !(1 << index);
                    }
                }
            }
            assert_invariants(&registry, &model);
        }
    }

    #[test]
    fn prop_foreign_owner_never_takes_a_pin(
        pin in 0..PIN_SPACE,
        dir in direction(),
        second in direction(),
    ) {
        let mut registry = PinRegistry::new(Esp32::new());
        if registry.allocate_pin(pin, dir, PinOwner::Relay).is_ok() {
            prop_assert!(registry.allocate_pin(pin, second, PinOwner::Button).is_err());
            prop_assert!(registry.deallocate_pin(pin, PinOwner::Button).is_err());
            prop_assert_eq!(registry.current_pin_owner(pin), PinOwner::Relay);
        } else {
            prop_assert!(!registry.is_pin_ok(pin, dir));
            prop_assert!(!registry.is_pin_allocated(pin));
        }
    }
}
