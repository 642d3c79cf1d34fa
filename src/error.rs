use thiserror::Error;

/// Errors surfaced by the fallible constructors and the I/O-backed channels.
///
/// Running a stream or a CRC engine never fails: exhaustion is reported through
/// `Option`/`bool` returns, so this type only covers configuration and transport.
#[derive(Error, Debug)]
pub enum BitcrcError {
    /// Underlying reader or writer failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CRC parameters that cannot describe a valid register
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bit pack wider than the 64-bit payload
    #[error("invalid bit width: {0} (max 64)")]
    InvalidWidth(u32),

    /// Unrecognized preset name or configuration value
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BitcrcError>;
