//! Mode classification and bitstream packing.
//!
//! One mode covers the whole payload: Numeric if every byte is an ASCII digit,
//! Alphanumeric if every byte is in the 45-symbol set, Byte otherwise.

use tracing::debug;

use super::tables;
use super::{RecoveryLevel, Version};
use crate::error::EncodeError;

static ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Data encoding mode of a symbol.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl Mode {
    /// Picks the densest mode that can represent every byte of `payload`.
    pub fn classify(payload: &[u8]) -> Self {
        if payload.iter().all(u8::is_ascii_digit) {
            Mode::Numeric
        } else if payload.iter().all(|&b| alphanumeric_index(b).is_some()) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        }
    }

    /// The 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        match self {
            Mode::Numeric => 0x1,
            Mode::Alphanumeric => 0x2,
            Mode::Byte => 0x4,
        }
    }

    /// Bits needed for `numchars` characters of payload, excluding headers.
    fn data_bit_length(self, numchars: usize) -> usize {
        match self {
            Mode::Numeric => {
                numchars / 3 * 10
                    + match numchars % 3 {
                        2 => 7,
                        1 => 4,
                        _ => 0,
                    }
            }
            Mode::Alphanumeric => numchars / 2 * 11 + (numchars % 2) * 6,
            Mode::Byte => numchars * 8,
        }
    }
}

fn alphanumeric_index(b: u8) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .iter()
        .position(|&c| c == b)
        .map(|i| i as u32)
}

/// An append-only sequence of bits, packed MSB-first into bytes.
#[derive(Clone, Default, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity((bits + 7) / 8),
            length: 0,
        }
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        for i in (0..len).rev() {
            let shift = 7 - (self.length & 7) as u8;
            let bit = ((val >> i) as u8) & 1;
            if shift == 7 {
                self.data.push(bit << shift);
            } else if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    /// Bit `i`, counting from the first appended bit.
    pub fn get(&self, i: usize) -> bool {
        (self.data[i >> 3] >> (7 - (i & 7))) & 1 != 0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// A payload packed into data bits for one mode, before any header.
pub struct Segment {
    mode: Mode,
    numchars: usize,
    bits: BitBuffer,
}

impl Segment {
    /// Classifies `payload` and packs it with the matching mode.
    pub fn new(payload: &[u8]) -> Self {
        let mode = Mode::classify(payload);
        let mut bits = BitBuffer::with_capacity(mode.data_bit_length(payload.len()));
        match mode {
            Mode::Numeric => {
                for chunk in payload.chunks(3) {
                    let value = chunk
                        .iter()
                        .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'));
                    bits.append_bits(value, chunk.len() as u8 * 3 + 1);
                }
            }
            Mode::Alphanumeric => {
                for chunk in payload.chunks(2) {
                    let value = chunk
                        .iter()
                        .filter_map(|&b| alphanumeric_index(b))
                        .fold(0u32, |acc, i| acc * 45 + i);
                    bits.append_bits(value, if chunk.len() == 2 { 11 } else { 6 });
                }
            }
            Mode::Byte => {
                for &b in payload {
                    bits.append_bits(u32::from(b), 8);
                }
            }
        }
        debug_assert_eq!(bits.len(), mode.data_bit_length(payload.len()));
        Self {
            mode,
            numchars: payload.len(),
            bits,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// Header plus data bits at this version, or `None` if the character
    /// count overflows the count indicator.
    pub fn total_bits(&self, ver: Version) -> Option<usize> {
        let ccbits = tables::char_count_bits(self.mode, ver);
        if self.numchars >= 1usize << ccbits {
            return None;
        }
        Some(4 + usize::from(ccbits) + self.bits.len())
    }
}

/// Data codewords for one symbol, padded to the exact capacity of `version`.
pub struct PackedData {
    pub version: Version,
    pub mode: Mode,
    pub codewords: Vec<u8>,
}

/// Chooses the smallest version in `minversion..=maxversion` that holds the
/// payload and produces its padded data codewords.
pub fn pack(
    payload: &[u8],
    level: RecoveryLevel,
    minversion: Version,
    maxversion: Version,
) -> Result<PackedData, EncodeError> {
    let seg = Segment::new(payload);

    let mut version = minversion;
    let datausedbits = loop {
        let datacapacitybits = tables::data_codewords(version, level) * 8;
        let dataused = seg.total_bits(version);
        match dataused {
            Some(n) if n <= datacapacitybits => break n,
            _ if version >= maxversion => {
                let required = dataused.unwrap_or_else(|| {
                    4 + usize::from(tables::char_count_bits(seg.mode, version)) + seg.bits.len()
                });
                return Err(EncodeError::content_too_long(required, datacapacitybits));
            }
            _ => version = Version::new(version.value() + 1)?,
        }
    };
    debug!(
        mode = ?seg.mode,
        version = version.value(),
        bits = datausedbits,
        "selected version"
    );

    let datacapacitybits = tables::data_codewords(version, level) * 8;
    let mut bb = BitBuffer::with_capacity(datacapacitybits);
    bb.append_bits(seg.mode.mode_bits(), 4);
    let count = u32::try_from(seg.numchars).map_err(|_| {
        EncodeError::content_too_long(datausedbits, datacapacitybits)
    })?;
    bb.append_bits(count, tables::char_count_bits(seg.mode, version));
    for i in 0..seg.bits.len() {
        bb.append_bits(u32::from(seg.bits.get(i)), 1);
    }
    debug_assert_eq!(bb.len(), datausedbits);

    // Terminator, then zero bits up to a byte boundary.
    let numzerobits = core::cmp::min(4, datacapacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    for &padbyte in [0xec, 0x11].iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }

    Ok(PackedData {
        version,
        mode: seg.mode,
        codewords: bb.into_bytes(),
    })
}
