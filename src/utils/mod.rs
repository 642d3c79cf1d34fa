//! # Bit Primitives
//!
//! Table-driven helpers shared by the bit stream and the CRC generator:
//!
//! - Bit reversal within an arbitrary width (used to reflect LSB-convention polynomials)
//! - Population count (Hamming weight)
//! - Rank of the most significant set bit
//!
//! ```rust
//! use bitcrc::utils::{bit_rank, bit_reverse, hamming_weight};
//!
//! assert_eq!(bit_reverse(0b1011, 4), 0b1101);
//! assert_eq!(hamming_weight(0xF0F0), 8);
//! assert_eq!(bit_rank(0x0100), 9);
//! ```

/// Bit reversal, population count and rank, with their brute-force references
pub mod bits;

pub use bits::*;
