use std::fmt;

use crate::error::{BitcrcError, Result};
use crate::utils::low_mask;

/// Widest field a single pack can carry
pub const MAX_PACK_WIDTH: u32 = 64;

/// A serialized field: `width` bits of `value`, right-justified.
///
/// Bits of `value` above `width` are ignored when the pack is written, and are
/// always zero after the pack is filled by a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitPack {
    width: u32,
    value: u64,
}

impl BitPack {
    /// Creates a pack of `width` bits carrying `value`.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds 64.
    pub const fn new(width: u32, value: u64) -> Self {
        assert!(width <= MAX_PACK_WIDTH, "bit pack width exceeds 64");
        Self { width, value }
    }

    /// Creates a pack, rejecting widths above 64 with an error.
    pub fn try_new(width: u32, value: u64) -> Result<Self> {
        if width > MAX_PACK_WIDTH {
            return Err(BitcrcError::InvalidWidth(width));
        }
        Ok(Self { width, value })
    }

    /// An empty pack of `width` bits, ready to be filled by a read.
    pub const fn empty(width: u32) -> Self {
        Self::new(width, 0)
    }

    /// Number of bits this pack occupies on the wire
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Payload restricted to the declared width
    pub const fn value(&self) -> u64 {
        self.value & low_mask(self.width)
    }

    /// Payload exactly as stored, including any bits above the width
    pub const fn raw_value(&self) -> u64 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: u64) {
        self.value = value & low_mask(self.width);
    }
}

impl fmt::Display for BitPack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return write!(f, "<empty>");
        }
        write!(f, "{:0width$b}", self.value(), width = self.width as usize)
    }
}

/// A pack whose width is fixed at compile time.
///
/// ```
/// use bitcrc::stream::{BitPack, FixedBitPack};
///
/// let symbol = FixedBitPack::<6>::new(0b101_010);
/// let pack: BitPack = symbol.into();
/// assert_eq!(pack.width(), 6);
/// assert_eq!(pack.value(), 0b101_010);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FixedBitPack<const WIDTH: u32> {
    value: u64,
}

impl<const WIDTH: u32> FixedBitPack<WIDTH> {
    const VALID: () = assert!(WIDTH <= MAX_PACK_WIDTH, "bit pack width exceeds 64");

    /// Width shared by every pack of this type
    pub const BITS: u32 = WIDTH;

    /// Wraps `value`; bits above `WIDTH` are ignored on write.
    pub const fn new(value: u64) -> Self {
        let () = Self::VALID;
        Self { value }
    }

    /// Payload restricted to `WIDTH` bits
    pub const fn value(&self) -> u64 {
        self.value & low_mask(WIDTH)
    }
}

impl<const WIDTH: u32> From<FixedBitPack<WIDTH>> for BitPack {
    fn from(pack: FixedBitPack<WIDTH>) -> Self {
        BitPack::new(WIDTH, pack.value)
    }
}
