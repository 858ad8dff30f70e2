use std::{
    fmt::{Debug, Formatter},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not},
};

#[cfg(test)]
mod tests;

/// Next bit position after the last attribute.
pub const ATTRIBUTE_INDEX_MAX: u32 = 16;

/// A set of attribute bits.
///
/// Each bit stands for one kind of observable change of an object.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeMask(u32);

impl AttributeMask {
    pub const NONE: Self = Self(0);
    pub const GAIN: Self = Self::bit(0);
    pub const TRANSPORT: Self = Self::bit(1);
    pub const POSITION: Self = Self::bit(2);
    pub const BQ_ENQUEUE: Self = Self::bit(3);
    pub const ABQ_ENQUEUE: Self = Self::bit(4);
    pub const PLAYSTATE: Self = Self::bit(5);
    pub const BUFFERS: Self = Self::bit(6);
    pub const PREFETCH: Self = Self::bit(7);
    /// Every bit below [`ATTRIBUTE_INDEX_MAX`].
    pub const ALL: Self = Self((1 << ATTRIBUTE_INDEX_MAX) - 1);

    /// Returns the mask containing only the bit at `index`.
    ///
    /// # Panic
    ///
    /// Panics if `index >= 32`.
    #[inline]
    pub const fn bit(index: u32) -> Self {
        assert!(index < u32::BITS, "attribute index out of range");
        Self(1 << index)
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the indices of the set bits, lowest first.
    ///
    /// Each step costs one `trailing_zeros`, so iterating costs one step per set bit
    /// rather than one step per bit position.
    #[inline]
    pub fn iter(self) -> SetBits {
        SetBits { remaining: self.0 }
    }
}

/// Iterator returned by [`AttributeMask::iter`].
#[derive(Clone, Debug)]
pub struct SetBits {
    remaining: u32,
}

impl Iterator for SetBits {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.remaining.trailing_zeros();
        self.remaining &= self.remaining - 1;
        Some(bit)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SetBits {}

impl IntoIterator for AttributeMask {
    type Item = u32;
    type IntoIter = SetBits;

    fn into_iter(self) -> SetBits {
        self.iter()
    }
}

impl BitOr for AttributeMask {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AttributeMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AttributeMask {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for AttributeMask {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for AttributeMask {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl Debug for AttributeMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
