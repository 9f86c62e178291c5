//! Error types for encoding and rendering.

use thiserror::Error;

/// Errors that can occur while encoding a payload into a QR symbol.
///
/// Only [`EncodeError::ContentTooLong`] is a normal runtime condition. The
/// version and mask variants come from constructing those types out of range,
/// and the matrix variants signal an inconsistency between the capacity
/// tables and the packed codewords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The packed bitstream does not fit in the largest allowed version.
    #[error("Content too long: {required_bits} bits required, capacity is {capacity_bits} bits")]
    ContentTooLong {
        /// Bits needed for mode indicator, count indicator and data.
        required_bits: usize,
        /// Data capacity of the largest version tried, in bits.
        capacity_bits: usize,
    },

    /// A version number outside 1..=40.
    #[error("Invalid version: {0} (expected 1..=40)")]
    InvalidVersion(u8),

    /// A mask number outside 0..=7.
    #[error("Invalid mask: {0} (expected 0..=7)")]
    InvalidMask(u8),

    /// More codeword bits than free data modules.
    #[error("Matrix overflow: {needed} data bits for {available} free modules")]
    MatrixOverflow { needed: usize, available: usize },

    /// Fewer codeword bits than free data modules.
    #[error("Matrix underflow: {needed} data bits for {available} free modules")]
    MatrixUnderflow { needed: usize, available: usize },
}

impl EncodeError {
    /// Create a ContentTooLong error.
    pub fn content_too_long(required_bits: usize, capacity_bits: usize) -> Self {
        Self::ContentTooLong {
            required_bits,
            capacity_bits,
        }
    }

    /// Pick overflow or underflow for a bit count that does not match the free modules.
    pub(crate) fn matrix_mismatch(needed: usize, available: usize) -> Self {
        if needed > available {
            Self::MatrixOverflow { needed, available }
        } else {
            Self::MatrixUnderflow { needed, available }
        }
    }
}

/// Errors produced by the rendering helpers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A zero pixel size, or one that makes the image too large.
    #[error("Invalid image size: {0}")]
    InvalidSize(i32),
}
