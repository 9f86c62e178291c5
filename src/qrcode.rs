#![forbid(unsafe_code)]
//! QR code encoding.
//!
//! This module turns a payload into a finished [`Symbol`] following QR Code
//! Model 2: versions 1 to 40, four recovery levels, and the numeric,
//! alphanumeric and byte modes. The pipeline is:
//!
//! payload -> [`segment`] bitstream -> [`codewords`] (Reed-Solomon + interleave)
//! -> [`matrix`] (function patterns + zigzag fill) -> [`mask`] selection ->
//! [`format`] information -> [`Symbol`].

pub mod codewords;
pub mod format;
pub mod galois;
pub mod mask;
pub mod matrix;
pub mod reed_solomon;
pub mod segment;
pub mod tables;

use core::str::FromStr;

use tracing::debug;

use crate::error::EncodeError;
use matrix::Matrix;

pub use segment::Mode;
pub use tables::max_byte_capacity;

/// A finished QR Code symbol: a square grid of dark and light modules.
///
/// Immutable once built. Renderers read it through [`Symbol::is_dark`].
///
/// # Example
///
/// ```rust
/// use qrsmith::qrcode::{encode_text, RecoveryLevel};
///
/// let symbol = encode_text("HELLO WORLD", RecoveryLevel::Highest).unwrap();
/// assert_eq!(symbol.version().value(), 2);
/// assert_eq!(symbol.dimension(), 25);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    version: Version,
    level: RecoveryLevel,
    mask: Mask,
    mode: Mode,
    /// Width and height in modules, 17 + 4 * version.
    size: usize,
    /// Row-major, `true` is dark.
    modules: Vec<bool>,
}

impl Symbol {
    /// Width and height in modules, between 21 and 177.
    pub fn dimension(&self) -> usize {
        self.size
    }

    /// Whether the module at (row, col) is dark. Coordinates outside the
    /// symbol are light, as the quiet zone is.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.modules[row * self.size + col]
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn recovery_level(&self) -> RecoveryLevel {
        self.level
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The modules row by row.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.size)
    }
}

/// Per-call encoder settings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodeOptions {
    /// Smallest version to consider.
    pub min_version: Version,
    /// Largest version to consider; content that does not fit fails with
    /// [`EncodeError::ContentTooLong`].
    pub max_version: Version,
    /// A fixed mask, or `None` to pick the one with the lowest penalty.
    pub mask: Option<Mask>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
        }
    }
}

/// Encodes a byte payload with default options.
///
/// The mode is chosen from the whole payload: numeric for ASCII digits only,
/// alphanumeric for the 45-character set, byte otherwise.
pub fn encode(payload: &[u8], level: RecoveryLevel) -> Result<Symbol, EncodeError> {
    encode_with(payload, level, &EncodeOptions::default())
}

/// Encodes UTF-8 text with default options.
pub fn encode_text(text: &str, level: RecoveryLevel) -> Result<Symbol, EncodeError> {
    encode(text.as_bytes(), level)
}

/// Encodes a byte payload.
///
/// # Errors
///
/// - [`EncodeError::ContentTooLong`] if the payload does not fit in
///   `options.max_version`.
/// - [`EncodeError::InvalidVersion`] if `options.min_version` is above
///   `options.max_version`.
/// - [`EncodeError::MatrixOverflow`] / [`EncodeError::MatrixUnderflow`] if
///   the packed codewords disagree with the free modules of the matrix.
pub fn encode_with(
    payload: &[u8],
    level: RecoveryLevel,
    options: &EncodeOptions,
) -> Result<Symbol, EncodeError> {
    if options.min_version > options.max_version {
        return Err(EncodeError::InvalidVersion(options.min_version.value()));
    }

    let packed = segment::pack(payload, level, options.min_version, options.max_version)?;
    let version = packed.version;
    let allcodewords = codewords::add_ecc_and_interleave(&packed.codewords, version, level);

    let mut matrix = Matrix::with_function_patterns(version);
    matrix.draw_codewords(&allcodewords, tables::remainder_bits(version))?;

    let mask = match options.mask {
        Some(mask) => mask,
        None => mask::choose_mask(&matrix, level),
    };
    matrix.apply_mask(mask);
    format::draw_format_bits(&mut matrix, level, mask);
    debug!(
        version = version.value(),
        ?level,
        mode = ?packed.mode,
        mask = mask.value(),
        "encoded symbol"
    );

    Ok(Symbol {
        version,
        level,
        mask,
        mode: packed.mode,
        size: matrix.size(),
        modules: matrix.into_modules(),
    })
}

/// Error correction level of a symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RecoveryLevel {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    Highest,
}

impl RecoveryLevel {
    pub const ALL: [RecoveryLevel; 4] = [
        RecoveryLevel::Low,
        RecoveryLevel::Medium,
        RecoveryLevel::Quartile,
        RecoveryLevel::Highest,
    ];

    /// Row index into the capacity tables.
    pub(crate) fn ordinal(self) -> usize {
        use RecoveryLevel::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            Highest => 3,
        }
    }

    /// The 2-bit level code used in format information.
    pub fn format_bits(self) -> u8 {
        use RecoveryLevel::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            Highest => 2,
        }
    }
}

impl FromStr for RecoveryLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(RecoveryLevel::Low),
            "m" | "medium" => Ok(RecoveryLevel::Medium),
            "q" | "quartile" => Ok(RecoveryLevel::Quartile),
            "h" | "high" | "highest" => Ok(RecoveryLevel::Highest),
            other => Err(format!("unknown recovery level: {}", other)),
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Errors
    ///
    /// [`EncodeError::InvalidVersion`] if the number is outside 1..=40.
    pub fn new(ver: u8) -> Result<Self, EncodeError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(EncodeError::InvalidVersion(ver))
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Width and height of a symbol of this version, in modules.
    pub const fn dimension(self) -> usize {
        self.0 as usize * 4 + 17
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// All eight masks in id order.
    pub const ALL: [Mask; 8] = [
        Mask(0),
        Mask(1),
        Mask(2),
        Mask(3),
        Mask(4),
        Mask(5),
        Mask(6),
        Mask(7),
    ];

    /// Creates a mask object from the given number.
    ///
    /// # Errors
    ///
    /// [`EncodeError::InvalidMask`] if the number is outside 0..=7.
    pub fn new(mask: u8) -> Result<Self, EncodeError> {
        if mask <= 7 {
            Ok(Self(mask))
        } else {
            Err(EncodeError::InvalidMask(mask))
        }
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }
}
