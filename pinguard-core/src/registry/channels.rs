//! Auxiliary channel allocator
//!
//! PWM/timer channels are a small pool with no owner tags. Blocks of
//! consecutive channels are handed out first-fit; the caller releases
//! a block with the same start and count it was given.

use core::ops::Range;

use pinguard_hal::PinPlatform;

use super::PinRegistry;
use crate::error::ChannelError;

/// Handle for a block of consecutive channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelBlock {
    start: u8,
    count: u8,
}

impl ChannelBlock {
    /// First channel of the block
    pub const fn start(&self) -> u8 {
        self.start
    }

    /// Number of channels in the block
    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Channel indices covered by the block
    pub fn channels(&self) -> Range<u8> {
        self.start..self.start + self.count
    }
}

impl<P: PinPlatform> PinRegistry<P> {
    /// Bits for `start..start + count`, clipped to the pool
    fn channel_mask(start: u8, count: u8) -> u32 {
        let end = start.saturating_add(count).min(P::CHANNEL_COUNT);
        (start..end).fold(0, |mask, index| mask | (1u32 << index))
    }

    /// Allocate `count` consecutive channels
    ///
    /// Returns the block on success. Nothing is marked allocated on
    /// failure.
    pub fn allocate_channels(&mut self, count: u8) -> Result<ChannelBlock, ChannelError> {
        if count == 0 || count > P::CHANNEL_COUNT {
            return Err(ChannelError::InvalidCount(count));
        }

        let mut run = 0u8;
        for index in 0..P::CHANNEL_COUNT {
            if self.is_channel_allocated(index) {
                run = 0;
                continue;
            }
            run += 1;
            if run == count {
                let start = index + 1 - count;
                self.channels |= Self::channel_mask(start, count);
                return Ok(ChannelBlock { start, count });
            }
        }

        Err(ChannelError::Exhausted)
    }

    /// Free `count` channels starting at `start`
    ///
    /// Indices past the pool are ignored. Channels carry no owner, so the
    /// caller is trusted to pass back what it was given.
    pub fn deallocate_channels(&mut self, start: u8, count: u8) {
        self.channels &= !Self::channel_mask(start, count);
    }

    /// Free a block returned by [`allocate_channels`](Self::allocate_channels)
    pub fn release_channels(&mut self, block: ChannelBlock) {
        self.deallocate_channels(block.start, block.count);
    }

    /// Check if a channel is in use
    pub fn is_channel_allocated(&self, index: u8) -> bool {
        index < P::CHANNEL_COUNT && self.channels & (1u32 << index) != 0
    }

    /// Number of channels currently free
    pub fn free_channel_count(&self) -> u8 {
        P::CHANNEL_COUNT - self.channels.count_ones() as u8
    }
}
