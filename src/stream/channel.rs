//! Byte transports for [`BitStream`](super::BitStream).
//!
//! A channel is a capability, not a storage type: two byte functions plus
//! three optional lifecycle hooks. Anything that can push or pop bytes can
//! back a stream, including closures and `std::io` readers and writers.

use std::io::{self, Read, Seek, SeekFrom, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::crc::CrcEngine;
use crate::error::{BitcrcError, Result};

/// Hook shared by sinks and sources.
pub trait Channel {
    /// Called after the stream clears its accumulators, so a backing store can
    /// rewind its position.
    fn after_reset(&mut self) {}
}

/// Destination of the bytes produced by a writing stream.
pub trait ByteSink: Channel {
    /// Accepts one byte.
    fn push_byte(&mut self, value: u8);

    /// Called after the stream emits its final partial byte.
    fn after_flush(&mut self) {}
}

/// Origin of the bytes consumed by a reading stream.
pub trait ByteSource: Channel {
    /// Yields the next byte, or `None` once exhausted.
    fn pop_byte(&mut self) -> Option<u8>;

    /// Called before the stream drops its receiver state on rewind.
    fn before_rewind(&mut self) {}
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn after_reset(&mut self) {
        (**self).after_reset()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn push_byte(&mut self, value: u8) {
        (**self).push_byte(value)
    }

    fn after_flush(&mut self) {
        (**self).after_flush()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn pop_byte(&mut self) -> Option<u8> {
        (**self).pop_byte()
    }

    fn before_rewind(&mut self) {
        (**self).before_rewind()
    }
}

impl Channel for Vec<u8> {
    fn after_reset(&mut self) {
        self.clear();
    }
}

impl ByteSink for Vec<u8> {
    fn push_byte(&mut self, value: u8) {
        self.push(value);
    }
}

impl Channel for BytesMut {
    fn after_reset(&mut self) {
        self.clear();
    }
}

impl ByteSink for BytesMut {
    fn push_byte(&mut self, value: u8) {
        self.put_u8(value);
    }
}

/// Reads a borrowed byte slice front to back.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a source positioned at the first byte
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, position: 0 }
    }

    /// Index of the next byte to be popped
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet popped
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }
}

impl Channel for SliceSource<'_> {
    fn after_reset(&mut self) {
        self.position = 0;
    }
}

impl ByteSource for SliceSource<'_> {
    fn pop_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    fn before_rewind(&mut self) {
        self.position = 0;
    }
}

/// Growable in-memory store that is both a sink and a source.
///
/// Writes append; reads advance a separate cursor. Rewinding moves the read
/// cursor back to the start, resetting also discards the contents.
#[derive(Debug, Clone, Default)]
pub struct ByteBuffer {
    data: BytesMut,
    read_position: usize,
}

impl ByteBuffer {
    /// Creates an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        ByteBuffer {
            data: BytesMut::with_capacity(capacity),
            read_position: 0,
        }
    }

    /// Everything written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index of the next byte to be popped
    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Converts the written contents into immutable `Bytes`
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        ByteBuffer {
            data: BytesMut::from(data),
            read_position: 0,
        }
    }
}

impl Channel for ByteBuffer {
    fn after_reset(&mut self) {
        self.data.clear();
        self.read_position = 0;
    }
}

impl ByteSink for ByteBuffer {
    fn push_byte(&mut self, value: u8) {
        self.data.put_u8(value);
    }
}

impl ByteSource for ByteBuffer {
    fn pop_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.read_position)?;
        self.read_position += 1;
        Some(byte)
    }

    fn before_rewind(&mut self) {
        self.read_position = 0;
    }
}

/// Sink writing through any `std::io::Write`.
///
/// `push_byte` cannot fail, so the first I/O error is latched (and logged);
/// later bytes are dropped until the error is taken.
#[derive(Debug)]
pub struct IoSink<W: Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: Write> IoSink<W> {
    /// Wraps a writer
    pub fn new(inner: W) -> Self {
        IoSink { inner, error: None }
    }

    /// Removes and returns the latched error, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Shared access to the writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutable access to the writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Returns the writer, or the latched error if one occurred.
    pub fn into_inner(self) -> Result<W> {
        match self.error {
            Some(e) => Err(BitcrcError::Io(e)),
            None => Ok(self.inner),
        }
    }

    fn latch(&mut self, e: io::Error) {
        log::warn!("io sink error: {}", e);
        if self.error.is_none() {
            self.error = Some(e);
        }
    }
}

impl<W: Write> Channel for IoSink<W> {}

impl<W: Write> ByteSink for IoSink<W> {
    fn push_byte(&mut self, value: u8) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.inner.write_all(&[value]) {
            self.latch(e);
        }
    }

    fn after_flush(&mut self) {
        if let Err(e) = self.inner.flush() {
            self.latch(e);
        }
    }
}

/// Source reading through any seekable `std::io::Read`.
///
/// Rewind and reset seek back to the position the reader had when wrapped.
/// Errors other than end-of-file are latched like in [`IoSink`].
#[derive(Debug)]
pub struct IoSource<R: Read + Seek> {
    inner: R,
    start: u64,
    error: Option<io::Error>,
}

impl<R: Read + Seek> IoSource<R> {
    /// Wraps a reader, remembering its current position as the rewind point
    pub fn new(mut inner: R) -> Result<Self> {
        let start = inner.stream_position()?;
        Ok(IoSource {
            inner,
            start,
            error: None,
        })
    }

    /// Removes and returns the latched error, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Returns the reader
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn latch(&mut self, e: io::Error) {
        log::warn!("io source error: {}", e);
        if self.error.is_none() {
            self.error = Some(e);
        }
    }

    fn seek_start(&mut self) {
        if let Err(e) = self.inner.seek(SeekFrom::Start(self.start)) {
            self.latch(e);
        }
    }
}

impl<R: Read + Seek> Channel for IoSource<R> {
    fn after_reset(&mut self) {
        self.seek_start();
    }
}

impl<R: Read + Seek> ByteSource for IoSource<R> {
    fn pop_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return None,
                Ok(_) => return Some(buf[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.latch(e);
                    return None;
                }
            }
        }
    }

    fn before_rewind(&mut self) {
        self.seek_start();
    }
}

/// Sink backed by a closure.
#[derive(Debug, Clone)]
pub struct FnSink<F>(pub F);

impl<F: FnMut(u8)> Channel for FnSink<F> {}

impl<F: FnMut(u8)> ByteSink for FnSink<F> {
    fn push_byte(&mut self, value: u8) {
        (self.0)(value)
    }
}

/// Source backed by a closure; `None` means exhausted.
#[derive(Debug, Clone)]
pub struct FnSource<F>(pub F);

impl<F: FnMut() -> Option<u8>> Channel for FnSource<F> {}

impl<F: FnMut() -> Option<u8>> ByteSource for FnSource<F> {
    fn pop_byte(&mut self) -> Option<u8> {
        (self.0)()
    }
}

/// Wraps a channel and folds every byte that passes through it into a CRC.
///
/// Pushed bytes are folded as they are emitted, popped bytes as they are
/// pulled. Note that a reading stream pulls whole bytes, so the checksum
/// covers the partial byte the stream is currently draining.
///
/// ```
/// use bitcrc::crc::CrcPreset;
/// use bitcrc::stream::{BitStream, Checksummed};
///
/// let mut stream = BitStream::new(Checksummed::new(Vec::new(), CrcPreset::Crc32Iso.engine()));
/// stream.write_bits(8, b'1' as u64);
/// stream.write_bits(8, b'2' as u64);
/// stream.write_flush();
/// assert_eq!(stream.get_ref().checksum(), CrcPreset::Crc32Iso.checksum(b"12"));
/// ```
#[derive(Debug, Clone)]
pub struct Checksummed<C> {
    inner: C,
    crc: CrcEngine,
}

impl<C> Checksummed<C> {
    /// Wraps `inner`, folding its traffic into `crc`
    pub fn new(inner: C, crc: CrcEngine) -> Self {
        Checksummed { inner, crc }
    }

    /// Wraps `inner` with an engine for the configured default preset
    pub fn with_default_crc(inner: C) -> Self {
        Self::new(inner, CrcEngine::default())
    }

    /// Checksum of the bytes seen since the last reset or rewind
    pub fn checksum(&self) -> u64 {
        self.crc.get()
    }

    /// The running engine
    pub fn crc(&self) -> &CrcEngine {
        &self.crc
    }

    /// Mutable access to the running engine
    pub fn crc_mut(&mut self) -> &mut CrcEngine {
        &mut self.crc
    }

    /// Shared access to the wrapped channel
    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    /// Mutable access to the wrapped channel
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Splits into the wrapped channel and the engine
    pub fn into_parts(self) -> (C, CrcEngine) {
        (self.inner, self.crc)
    }
}

impl<C: Channel> Channel for Checksummed<C> {
    fn after_reset(&mut self) {
        self.inner.after_reset();
        self.crc.reset();
    }
}

impl<C: ByteSink> ByteSink for Checksummed<C> {
    fn push_byte(&mut self, value: u8) {
        self.crc.update_byte(value);
        self.inner.push_byte(value);
    }

    fn after_flush(&mut self) {
        self.inner.after_flush();
    }
}

impl<C: ByteSource> ByteSource for Checksummed<C> {
    fn pop_byte(&mut self) -> Option<u8> {
        let byte = self.inner.pop_byte()?;
        self.crc.update_byte(byte);
        Some(byte)
    }

    fn before_rewind(&mut self) {
        self.inner.before_rewind();
        self.crc.reset();
    }
}
