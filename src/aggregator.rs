use {
    crate::error::SlotError,
    parking_lot::Mutex,
    std::{
        fmt::{Debug, Display, Formatter},
        num::NonZeroU32,
    },
};

#[cfg(test)]
mod tests;

/// Number of instance slots tracked by an [`Aggregator`].
pub const MAX_INSTANCES: u32 = u32::BITS;

/// A 1-based index into an aggregator's changed-instance mask.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct InstanceSlot(NonZeroU32);

impl InstanceSlot {
    /// Validates a raw slot number.
    ///
    /// Slots are `1..=MAX_INSTANCES`.
    pub fn new(slot: u32) -> Result<Self, SlotError> {
        match NonZeroU32::new(slot) {
            Some(s) if slot - 1 < MAX_INSTANCES => Ok(Self(s)),
            _ => Err(SlotError::OutOfRange(slot)),
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the bit of this slot in the changed-instance mask.
    #[inline]
    pub fn mask_bit(self) -> u32 {
        1 << (self.0.get() - 1)
    }
}

impl Display for InstanceSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Collects which object instances have pending attribute changes.
///
/// Objects set their bit in the changed-instance mask when they go from clean to dirty.
/// A downstream consumer periodically drains the mask with [`Aggregator::take_changed`]
/// and then drains each flagged object.
///
/// The aggregator has its own lock. Objects only take it after releasing their own lock,
/// so the two are never held at the same time.
#[derive(Default)]
pub struct Aggregator {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    changed: u32,
    allocated: u32,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the lowest free instance slot.
    pub fn allocate_slot(&self) -> Result<InstanceSlot, SlotError> {
        let state = &mut *self.state.lock();
        let free = !state.allocated;
        if free == 0 {
            return Err(SlotError::Exhausted {
                capacity: MAX_INSTANCES,
            });
        }
        let slot = InstanceSlot::new(free.trailing_zeros() + 1)?;
        state.allocated |= slot.mask_bit();
        Ok(slot)
    }

    /// Returns a slot to the pool.
    ///
    /// A pending change bit of the slot is discarded.
    pub fn release_slot(&self, slot: InstanceSlot) {
        let state = &mut *self.state.lock();
        state.allocated &= !slot.mask_bit();
        state.changed &= !slot.mask_bit();
    }

    /// Marks the instance in `slot` as changed.
    pub(crate) fn notify(&self, slot: InstanceSlot) {
        self.state.lock().changed |= slot.mask_bit();
        tracing::trace!(%slot, "instance marked changed");
    }

    /// Returns the changed-instance mask.
    pub fn changed_mask(&self) -> u32 {
        self.state.lock().changed
    }

    /// Returns the changed-instance mask and clears it.
    pub fn take_changed(&self) -> u32 {
        let changed = std::mem::take(&mut self.state.lock().changed);
        if changed != 0 {
            tracing::trace!(changed = format_args!("{changed:#x}"), "drained changed instances");
        }
        changed
    }

    /// Returns whether `slot` is flagged in the changed-instance mask.
    pub fn is_changed(&self, slot: InstanceSlot) -> bool {
        self.state.lock().changed & slot.mask_bit() != 0
    }
}

impl Debug for Aggregator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Aggregator");
        match self.state.try_lock() {
            Some(state) => s
                .field("changed", &format_args!("{:#x}", state.changed))
                .field("allocated", &format_args!("{:#x}", state.allocated)),
            None => s.field("state", &format_args!("<locked>")),
        };
        s.finish()
    }
}
