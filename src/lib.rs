#![doc(html_root_url = "https://docs.rs/bitcrc/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # bitcrc - bit-exact binary I/O
//!
//! `bitcrc` covers the two bit-order-sensitive pieces of a binary format:
//! packing fields of arbitrary width into bytes, and checksumming those bytes
//! with a CRC of arbitrary degree.
//!
//! ## Features
//!
//! ### Bit streams
//! - MSB-first packing of 0..=64-bit fields, with explicit zero-padded flush
//! - Best-effort reads that zero-fill past end of data, plus a `can_read` probe
//! - Pluggable byte transports: `Vec<u8>`, `BytesMut`, slices, `std::io`, closures
//!
//! ### CRCs
//! - Any degree from 1 to 64 bits, MSB or LSB (reflected) convention
//! - 256-entry tables generated by GF(2) linearity, shareable across engines
//! - Bit-by-bit reference fold for verification
//! - Presets: CRC-8/SMBUS, CRC-16/CCITT-FALSE, CRC-16/X-25, CRC-32/ISO, CRC-32/MPEG-2, CRC-64/XZ
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! bitcrc = "0.1.0"
//! ```
//!
//! ### Writing a checksummed record
//!
//! ```rust
//! use bitcrc::crc::CrcPreset;
//! use bitcrc::stream::{BitPack, BitStream, Checksummed, SliceSource};
//!
//! let mut writer = BitStream::new(Checksummed::new(Vec::new(), CrcPreset::Crc16Ccitt.engine()));
//! writer.write(BitPack::new(4, 0x9));   // version
//! writer.write(BitPack::new(12, 0x2A)); // length
//! writer.write_flush();
//! let checksum = writer.get_ref().checksum();
//! writer.write(BitPack::new(16, checksum));
//! let (bytes, _) = writer.into_inner().into_parts();
//!
//! let mut reader = BitStream::new(SliceSource::new(&bytes));
//! assert_eq!(reader.read_bits(4), 0x9);
//! assert_eq!(reader.read_bits(12), 0x2A);
//! assert_eq!(reader.read_bits(16), CrcPreset::Crc16Ccitt.checksum(&bytes[..2]));
//! ```
//!
//! ## Module Overview
//!
//! - `utils`: byte-table bit primitives (reverse, population count, rank)
//! - `stream`: bit packs, the bit stream engine and its byte channels
//! - `crc`: table generation, the CRC engine and presets
//! - `config`: process-wide defaults (CRC preset)
//! - `error`: error type and result alias
//!
/// Table-driven CRC computation
pub mod crc;

/// Configuration module
pub mod config;

/// Error types and utilities
pub mod error;

/// Bit packing over byte channels
pub mod stream;

/// Bit-level primitives
pub mod utils;

pub use crc::{Convention, CrcEngine, CrcParams, CrcPreset, CrcTable};
pub use error::{BitcrcError, Result};
pub use stream::{BitPack, BitStream, FixedBitPack};
