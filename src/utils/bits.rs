//! Byte-table bit primitives.
//!
//! Every table here is derived once, on first use, from the matching
//! `*_bruteforce` function that walks a value one bit at a time. The table
//! forms must agree with the brute-force forms for every byte.

use lazy_static::lazy_static;

lazy_static! {
    static ref REVERSE_TABLE: [u8; 256] =
        build_table(|b| bit_reverse_bruteforce(b as u64, 8) as u8);
    static ref WEIGHT_TABLE: [u8; 256] = build_table(|b| hamming_weight_bruteforce(b as u64) as u8);
    static ref RANK_TABLE: [u8; 256] = build_table(|b| bit_rank_bruteforce(b as u64) as u8);
}

fn build_table(f: impl Fn(usize) -> u8) -> [u8; 256] {
    log::trace!("generating 256-entry bit primitive table");
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = f(i);
    }
    table
}

/// Mask selecting the low `width` bits of a `u64`. Widths of 64 and above yield all ones.
#[inline]
pub const fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Reverses the order of the low `width` bits of `value`, one bit at a time.
///
/// Bits above `width` are ignored and the result fits in `width` bits.
pub fn bit_reverse_bruteforce(value: u64, width: u32) -> u64 {
    let width = width.min(64);
    let mut out = 0u64;
    for i in 0..width {
        if (value >> i) & 1 == 1 {
            out |= 1 << (width - 1 - i);
        }
    }
    out
}

/// Counts set bits one at a time.
pub fn hamming_weight_bruteforce(value: u64) -> u32 {
    let mut count = 0;
    let mut v = value;
    while v != 0 {
        count += (v & 1) as u32;
        v >>= 1;
    }
    count
}

/// 1-based position of the highest set bit, found by scanning from the top.
pub fn bit_rank_bruteforce(value: u64) -> u32 {
    for k in (0..64).rev() {
        if (value >> k) & 1 == 1 {
            return k + 1;
        }
    }
    0
}

/// Reverses a single byte through the lookup table.
#[inline]
pub fn reverse_byte(byte: u8) -> u8 {
    REVERSE_TABLE[byte as usize]
}

/// Reverses the order of the low `width` bits of `value` (0..=64).
///
/// Works a byte at a time: the full 64-bit value is reversed by swapping byte
/// positions and reversing each byte through the table, then shifted down so
/// only the requested `width` bits remain.
///
/// ```
/// use bitcrc::utils::bit_reverse;
///
/// assert_eq!(bit_reverse(0b0011, 4), 0b1100);
/// assert_eq!(bit_reverse(0x1021, 16), 0x8408);
/// ```
pub fn bit_reverse(value: u64, width: u32) -> u64 {
    if width == 0 {
        return 0;
    }
    let width = width.min(64);
    let value = value & low_mask(width);
    let mut reversed = 0u64;
    for i in 0..8 {
        let byte = (value >> (8 * i)) as u8;
        reversed |= (reverse_byte(byte) as u64) << (8 * (7 - i));
    }
    reversed >> (64 - width)
}

/// Population count, summed per byte through the lookup table.
pub fn hamming_weight(value: u64) -> u32 {
    value
        .to_le_bytes()
        .iter()
        .map(|&b| WEIGHT_TABLE[b as usize] as u32)
        .sum()
}

/// 1-based index of the highest set bit, or 0 when `value == 0`.
///
/// For `2^(k-1) <= x < 2^k`, `bit_rank(x) == k`. The search halves the
/// remaining width (64, 32, 16) and finishes in an 8-bit lookup table.
///
/// ```
/// use bitcrc::utils::bit_rank;
///
/// assert_eq!(bit_rank(0), 0);
/// assert_eq!(bit_rank(1), 1);
/// assert_eq!(bit_rank(0x80), 8);
/// assert_eq!(bit_rank(u64::MAX), 64);
/// ```
pub fn bit_rank(value: u64) -> u32 {
    let mut v = value;
    let mut rank = 0;
    let mut half = 32;
    while half >= 8 {
        let high = v >> half;
        if high != 0 {
            v = high;
            rank += half;
        } else {
            v &= low_mask(half);
        }
        half /= 2;
    }
    rank + RANK_TABLE[v as usize] as u32
}
