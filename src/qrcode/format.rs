//! BCH-protected format information (15 bits) and version information (18 bits).

use super::matrix::Matrix;
use super::{Mask, RecoveryLevel, Version};

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_XOR_MASK: u32 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1f25;

/// The 15-bit format word for this level and mask, mask constant applied.
pub fn format_bits(level: RecoveryLevel, mask: Mask) -> u32 {
    let data = u32::from((level.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
    }
    ((data << 10) | rem) ^ FORMAT_XOR_MASK
}

/// The 18-bit version word: 6 version bits then 12 BCH check bits.
pub fn version_bits(ver: Version) -> u32 {
    let data = u32::from(ver.value());
    let mut rem: u32 = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    (data << 12) | rem
}

/// Recovers level and mask from a possibly damaged 15-bit format word.
///
/// Any two valid format words differ in at least 7 bits, so up to 3 flipped
/// bits are corrected.
pub fn decode_format_bits(bits: u32) -> Option<(RecoveryLevel, Mask)> {
    RecoveryLevel::ALL
        .iter()
        .flat_map(|&level| Mask::ALL.iter().map(move |&mask| (level, mask)))
        .map(|(level, mask)| ((format_bits(level, mask) ^ bits).count_ones(), level, mask))
        .filter(|&(distance, _, _)| distance <= 3)
        .min_by_key(|&(distance, _, _)| distance)
        .map(|(_, level, mask)| (level, mask))
}

/// Recovers the version from a possibly damaged 18-bit version word,
/// correcting up to 3 flipped bits.
pub fn decode_version_bits(bits: u32) -> Option<Version> {
    (7..=40u8)
        .filter_map(|n| Version::new(n).ok())
        .map(|ver| ((version_bits(ver) ^ bits).count_ones(), ver))
        .filter(|&(distance, _)| distance <= 3)
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, ver)| ver)
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}

/// Writes both copies of the format word. Bit 14 is the most significant.
pub(crate) fn draw_format_bits(matrix: &mut Matrix, level: RecoveryLevel, mask: Mask) {
    let bits = format_bits(level, mask);
    let size = matrix.size();

    // Around the top-left finder: down column 8, then left along row 8.
    for i in 0..6 {
        matrix.set(i, 8, get_bit(bits, i));
    }
    matrix.set(7, 8, get_bit(bits, 6));
    matrix.set(8, 8, get_bit(bits, 7));
    matrix.set(8, 7, get_bit(bits, 8));
    for i in 9..15 {
        matrix.set(8, 14 - i, get_bit(bits, i));
    }

    // Split between the other two finders.
    for i in 0..8 {
        matrix.set(8, size - 1 - i, get_bit(bits, i));
    }
    for i in 8..15 {
        matrix.set(size - 15 + i, 8, get_bit(bits, i));
    }
    matrix.set(size - 8, 8, true);
}

/// Writes both 3x6 copies of the version word (version 7 and up).
pub(crate) fn draw_version_bits(matrix: &mut Matrix, ver: Version) {
    let bits = version_bits(ver);
    let size = matrix.size();
    for i in 0..18 {
        let bit = get_bit(bits, i);
        let a = size - 11 + (i % 3);
        let b = i / 3;
        matrix.set_function(b, a, bit);
        matrix.set_function(a, b, bit);
    }
}

/// Reads the top-left format copy back, in the order `draw_format_bits` wrote it.
pub fn read_format_bits<F: Fn(usize, usize) -> bool>(get: F) -> u32 {
    let mut positions: Vec<(usize, usize)> = (0..6).map(|i| (i, 8)).collect();
    positions.extend([(7, 8), (8, 8), (8, 7)]);
    positions.extend((9..15).map(|i| (8, 14 - i)));
    positions
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &(row, col))| acc | (u32::from(get(row, col)) << i))
}

/// Reads the second format copy, split between the top-right and bottom-left finders.
pub fn read_format_bits_second<F: Fn(usize, usize) -> bool>(get: F, size: usize) -> u32 {
    let mut acc = 0u32;
    for i in 0..8 {
        acc |= u32::from(get(8, size - 1 - i)) << i;
    }
    for i in 8..15 {
        acc |= u32::from(get(size - 15 + i, 8)) << i;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_format_words() {
        let m0 = Mask::new(0).unwrap();
        assert_eq!(format_bits(RecoveryLevel::Low, m0), 0b111011111000100);
        assert_eq!(format_bits(RecoveryLevel::Medium, m0), 0b101010000010010);
        assert_eq!(format_bits(RecoveryLevel::Quartile, m0), 0b011010101011111);
        assert_eq!(format_bits(RecoveryLevel::Highest, m0), 0b001011010001001);
        assert_eq!(
            format_bits(RecoveryLevel::Medium, Mask::new(5).unwrap()),
            0b100000011001110
        );
    }

    #[test]
    fn test_known_version_words() {
        assert_eq!(version_bits(Version::new(7).unwrap()), 0x07c94);
        assert_eq!(version_bits(Version::new(21).unwrap()), 0x15683);
        assert_eq!(version_bits(Version::MAX), 0x28c69);
    }

    #[test]
    fn test_format_corrects_up_to_three_flips() {
        for level in RecoveryLevel::ALL {
            for mask in Mask::ALL {
                let word = format_bits(level, mask);
                assert_eq!(decode_format_bits(word), Some((level, mask)));
                for a in 0..15 {
                    assert_eq!(decode_format_bits(word ^ (1 << a)), Some((level, mask)));
                    for b in (a + 1)..15 {
                        let flipped = word ^ (1 << a) ^ (1 << b);
                        assert_eq!(decode_format_bits(flipped), Some((level, mask)));
                    }
                }
                let flipped = word ^ 0b111;
                assert_eq!(decode_format_bits(flipped), Some((level, mask)));
            }
        }
    }

    #[test]
    fn test_version_corrects_up_to_three_flips() {
        for n in 7..=40u8 {
            let ver = Version::new(n).unwrap();
            let word = version_bits(ver);
            for a in 0..18 {
                for b in (a + 1)..18 {
                    assert_eq!(decode_version_bits(word ^ (1 << a) ^ (1 << b)), Some(ver));
                }
            }
            assert_eq!(decode_version_bits(word ^ 0b100_0000_0100_0001), Some(ver));
        }
    }

    #[test]
    fn test_format_copies_read_back() {
        let ver = Version::new(3).unwrap();
        let mut m = Matrix::with_function_patterns(ver);
        let mask = Mask::new(6).unwrap();
        draw_format_bits(&mut m, RecoveryLevel::Quartile, mask);
        let word = format_bits(RecoveryLevel::Quartile, mask);
        assert_eq!(read_format_bits(|r, c| m.get(r, c)), word);
        assert_eq!(read_format_bits_second(|r, c| m.get(r, c), m.size()), word);
    }

    #[test]
    fn test_version_blocks_written_transposed() {
        let ver = Version::new(7).unwrap();
        let m = Matrix::with_function_patterns(ver);
        let size = m.size();
        let bits = version_bits(ver);
        for i in 0..18 {
            let expected = get_bit(bits, i);
            assert_eq!(m.get(i / 3, size - 11 + i % 3), expected);
            assert_eq!(m.get(size - 11 + i % 3, i / 3), expected);
        }
    }
}
