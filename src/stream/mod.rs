//! # MSB-first bit stream
//!
//! [`BitStream`] packs [`BitPack`] fields into bytes and unpacks them again.
//! The most significant bit of each pack goes first, and successive packs are
//! concatenated without padding until an explicit [`write_flush`].
//!
//! The stream keeps only two partial bytes (one for each direction). Byte
//! transport is delegated to a channel implementing [`ByteSink`] and/or
//! [`ByteSource`], see the [`channel`] module.
//!
//! ## Example: packing a header
//!
//! ```rust
//! use bitcrc::stream::{BitPack, BitStream, SliceSource};
//!
//! let mut writer = BitStream::new(Vec::new());
//! writer.write(BitPack::new(3, 0b101));
//! writer.write(BitPack::new(7, 0x55));
//! writer.write_flush();
//! let bytes = writer.into_inner();
//! assert_eq!(bytes, vec![0b1011_0101, 0b0100_0000]);
//!
//! let mut reader = BitStream::new(SliceSource::new(&bytes));
//! assert_eq!(reader.read_bits(3), 0b101);
//! assert_eq!(reader.read_bits(7), 0x55);
//! ```
//!
//! ## End of data
//!
//! Reads never fail. When the source runs dry in the middle of a pack, the
//! missing low bits read as zero. Use [`can_read`] first when the caller needs
//! to tell real zeros from exhaustion.
//!
//! [`write_flush`]: BitStream::write_flush
//! [`can_read`]: BitStream::can_read

/// Byte transports and their lifecycle hooks
pub mod channel;

/// Fixed- and runtime-width bit fields
pub mod pack;


pub use channel::{
    ByteBuffer, ByteSink, ByteSource, Channel, Checksummed, FnSink, FnSource, IoSink, IoSource,
    SliceSource,
};
pub use pack::{BitPack, FixedBitPack, MAX_PACK_WIDTH};

use crate::utils::low_mask;

/// Whether an accumulator holds a partial byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No bits pending
    Idle,
    /// Between 1 and 7 bits pending
    Accumulating,
}

/// Bit-level serializer/deserializer over a byte channel.
///
/// Writing requires `C: ByteSink`, reading `C: ByteSource`; a channel that is
/// both (such as [`ByteBuffer`]) can be written, flushed, rewound and read back
/// through the same stream.
#[derive(Debug)]
pub struct BitStream<C> {
    channel: C,
    sender_byte: u8,
    sender_free: u32,
    receiver_byte: u8,
    receiver_available: u32,
}

impl<C> BitStream<C> {
    /// Creates an idle stream over `channel`
    pub fn new(channel: C) -> Self {
        BitStream {
            channel,
            sender_byte: 0,
            sender_free: 8,
            receiver_byte: 0,
            receiver_available: 0,
        }
    }

    /// Shared access to the channel
    pub fn get_ref(&self) -> &C {
        &self.channel
    }

    /// Mutable access to the channel
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Returns the channel, dropping any unflushed bits
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Bits written but not yet emitted (0..=7)
    pub fn pending_write_bits(&self) -> u32 {
        8 - self.sender_free
    }

    /// Bits pulled from the source but not yet read (0..=8)
    pub fn available_read_bits(&self) -> u32 {
        self.receiver_available
    }

    /// State of the sender accumulator
    pub fn write_state(&self) -> StreamState {
        if self.sender_free == 8 {
            StreamState::Idle
        } else {
            StreamState::Accumulating
        }
    }

    /// State of the receiver accumulator
    pub fn read_state(&self) -> StreamState {
        if self.receiver_available == 0 {
            StreamState::Idle
        } else {
            StreamState::Accumulating
        }
    }

    fn clear_sender(&mut self) {
        self.sender_byte = 0;
        self.sender_free = 8;
    }

    fn clear_receiver(&mut self) {
        self.receiver_byte = 0;
        self.receiver_available = 0;
    }

    /// Drops the rest of the partially read byte so the next read starts on a
    /// byte boundary. Returns the number of bits skipped.
    pub fn read_align(&mut self) -> u32 {
        let skipped = self.receiver_available;
        self.clear_receiver();
        skipped
    }
}

impl<C: Default> Default for BitStream<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C: Channel> BitStream<C> {
    /// Clears both accumulators and lets the channel rewind.
    pub fn reset(&mut self) {
        self.clear_sender();
        self.clear_receiver();
        self.channel.after_reset();
    }
}

impl<C: ByteSink> BitStream<C> {
    /// Appends `pack.width()` bits, most significant first.
    ///
    /// Bits of the value above the width are ignored. A byte is pushed to the
    /// sink every time eight bits have accumulated.
    pub fn write(&mut self, pack: impl Into<BitPack>) {
        let pack = pack.into();
        let value = pack.value();
        let mut remaining = pack.width();

        while remaining > 0 {
            let take = remaining.min(self.sender_free);
            let chunk = (value >> (remaining - take)) & low_mask(take);
            self.sender_byte |= (chunk as u8) << (self.sender_free - take);
            self.sender_free -= take;
            remaining -= take;

            if self.sender_free == 0 {
                self.channel.push_byte(self.sender_byte);
                self.clear_sender();
            }
        }
    }

    /// Shorthand for `write(BitPack::new(width, value))`.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds 64.
    pub fn write_bits(&mut self, width: u32, value: u64) {
        self.write(BitPack::new(width, value));
    }

    /// Emits any pending bits as one final byte, zero-padded at the low end,
    /// then calls the sink's `after_flush` hook.
    ///
    /// With nothing pending no byte is emitted, so repeated flushes are harmless.
    pub fn write_flush(&mut self) {
        if self.sender_free < 8 {
            self.channel.push_byte(self.sender_byte);
            self.clear_sender();
        }
        self.channel.after_flush();
    }
}

impl<C: ByteSource> BitStream<C> {
    fn pull(&mut self) -> bool {
        match self.channel.pop_byte() {
            Some(byte) => {
                self.receiver_byte = byte;
                self.receiver_available = 8;
                true
            }
            None => false,
        }
    }

    /// Reports whether at least `bits` bits can be read without hitting the
    /// end of the source. Never consumes.
    ///
    /// If the receiver is empty one byte is pulled from the source; the check
    /// looks no further ahead, so it answers reliably for `bits <= 8`.
    /// `can_read(0)` is always true and never pulls.
    pub fn can_read(&mut self, bits: u32) -> bool {
        if bits == 0 {
            return true;
        }
        if self.receiver_available == 0 {
            self.pull();
        }
        self.receiver_available >= bits
    }

    /// [`can_read`](Self::can_read) for the width of `pack`
    pub fn can_read_pack(&mut self, pack: &BitPack) -> bool {
        self.can_read(pack.width())
    }

    /// Fills `pack` with its next `width` bits.
    ///
    /// Bits above the width are zero afterwards. If the source runs out, the
    /// remaining low bits are zero.
    pub fn read(&mut self, pack: &mut BitPack) {
        let value = self.read_bits(pack.width());
        pack.set_value(value);
    }

    /// Reads `width` bits (capped at 64) and returns them right-justified.
    pub fn read_bits(&mut self, width: u32) -> u64 {
        let mut remaining = width.min(MAX_PACK_WIDTH);
        let mut value = 0u64;

        while remaining > 0 {
            if self.receiver_available == 0 && !self.pull() {
                log::trace!("source exhausted, zero-filling {} bits", remaining);
                return value.checked_shl(remaining).unwrap_or(0);
            }

            let take = remaining.min(self.receiver_available);
            let shift = self.receiver_available - take;
            let chunk = (self.receiver_byte >> shift) as u64 & low_mask(take);
            value = (value << take) | chunk;
            self.receiver_available -= take;
            remaining -= take;
        }

        value
    }

    /// Lets the source rewind, then discards the partially read byte.
    pub fn read_rewind(&mut self) {
        self.channel.before_rewind();
        self.clear_receiver();
    }
}
