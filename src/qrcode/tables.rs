//! Capacity and layout tables, keyed by version and recovery level.
//!
//! Every lookup takes an already validated [`Version`], so the only failure
//! point is [`Version::new`].

use super::segment::Mode;
use super::{RecoveryLevel, Version};

/// Total codewords (data + EC) per version. Index 0 is unused.
static TOTAL_CODEWORDS: [u16; 41] = [
    0, 26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761,
    2876, 3034, 3196, 3362, 3532, 3706,
];

/// Zero bits left over after the last codeword. Index 0 is unused.
static REMAINDER_BITS: [u8; 41] = [
    0, 0, 7, 7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 3, 3, 3, 3,
    3, 3, 3, 0, 0, 0, 0, 0, 0,
];

static ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Highest
];

static NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // Highest
];

/// Alignment pattern centre coordinates (shared by rows and columns).
static ALIGNMENT_PATTERN_POSITIONS: [&[u8]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

fn table_get(table: &'static [[u8; 41]; 4], ver: Version, level: RecoveryLevel) -> usize {
    usize::from(table[level.ordinal()][usize::from(ver.value())])
}

/// Data plus EC codewords in a symbol of this version.
pub fn total_codewords(ver: Version) -> usize {
    usize::from(TOTAL_CODEWORDS[usize::from(ver.value())])
}

/// Zero bits placed after the last codeword.
pub fn remainder_bits(ver: Version) -> usize {
    usize::from(REMAINDER_BITS[usize::from(ver.value())])
}

pub fn ec_codewords_per_block(ver: Version, level: RecoveryLevel) -> usize {
    table_get(&ECC_CODEWORDS_PER_BLOCK, ver, level)
}

pub fn num_blocks(ver: Version, level: RecoveryLevel) -> usize {
    table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, level)
}

/// Data codewords available after reserving every block's EC codewords.
pub fn data_codewords(ver: Version, level: RecoveryLevel) -> usize {
    total_codewords(ver) - ec_codewords_per_block(ver, level) * num_blocks(ver, level)
}

/// How the data codewords of one (version, level) split into blocks.
///
/// Group 1 holds `num_short_blocks` blocks of `short_data_len` data codewords;
/// the remaining blocks (group 2) hold one more.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockLayout {
    pub num_blocks: usize,
    pub num_short_blocks: usize,
    pub short_data_len: usize,
    pub ec_len: usize,
}

impl BlockLayout {
    pub fn data_len(&self, block: usize) -> usize {
        self.short_data_len + usize::from(block >= self.num_short_blocks)
    }
}

pub fn block_layout(ver: Version, level: RecoveryLevel) -> BlockLayout {
    let total = total_codewords(ver);
    let num_blocks = num_blocks(ver, level);
    let ec_len = ec_codewords_per_block(ver, level);
    BlockLayout {
        num_blocks,
        num_short_blocks: num_blocks - total % num_blocks,
        short_data_len: total / num_blocks - ec_len,
        ec_len,
    }
}

/// Alignment pattern centres for this version; empty for version 1.
pub fn alignment_positions(ver: Version) -> &'static [u8] {
    ALIGNMENT_PATTERN_POSITIONS[usize::from(ver.value())]
}

/// Width of the character-count indicator.
pub fn char_count_bits(mode: Mode, ver: Version) -> u8 {
    let widths = match mode {
        Mode::Numeric => [10, 12, 14],
        Mode::Alphanumeric => [9, 11, 13],
        Mode::Byte => [8, 16, 16],
    };
    match ver.value() {
        1..=9 => widths[0],
        10..=26 => widths[1],
        _ => widths[2],
    }
}

/// Largest byte-mode payload that fits in a version 40 symbol at this level.
pub fn max_byte_capacity(level: RecoveryLevel) -> usize {
    let bits = data_codewords(Version::MAX, level) * 8;
    let header = 4 + usize::from(char_count_bits(Mode::Byte, Version::MAX));
    (bits - header) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [RecoveryLevel; 4] = [
        RecoveryLevel::Low,
        RecoveryLevel::Medium,
        RecoveryLevel::Quartile,
        RecoveryLevel::Highest,
    ];

    fn versions() -> impl Iterator<Item = Version> {
        (1..=40u8).map(|v| Version::new(v).unwrap())
    }

    // Modules left for data after all function patterns, computed geometrically.
    fn raw_data_modules(ver: Version) -> usize {
        let v = usize::from(ver.value());
        let mut result = (16 * v + 128) * v + 64;
        if v >= 2 {
            let numalign = v / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if v >= 7 {
                result -= 36;
            }
        }
        result
    }

    #[test]
    fn test_total_codewords_match_geometry() {
        for ver in versions() {
            let raw = raw_data_modules(ver);
            assert_eq!(total_codewords(ver), raw / 8, "version {}", ver.value());
            assert_eq!(remainder_bits(ver), raw % 8, "version {}", ver.value());
        }
    }

    #[test]
    fn test_max_byte_capacity() {
        assert_eq!(max_byte_capacity(RecoveryLevel::Low), 2953);
        assert_eq!(max_byte_capacity(RecoveryLevel::Medium), 2331);
        assert_eq!(max_byte_capacity(RecoveryLevel::Quartile), 1663);
        assert_eq!(max_byte_capacity(RecoveryLevel::Highest), 1273);
        assert_eq!(data_codewords(Version::MAX, RecoveryLevel::Highest), 1276);
    }

    #[test]
    fn test_block_layout_covers_all_codewords() {
        for ver in versions() {
            for level in LEVELS {
                let layout = block_layout(ver, level);
                let data: usize = (0..layout.num_blocks).map(|i| layout.data_len(i)).sum();
                assert_eq!(data, data_codewords(ver, level));
                assert_eq!(data + layout.num_blocks * layout.ec_len, total_codewords(ver));
                assert!(layout.num_short_blocks >= 1);
            }
        }
    }

    #[test]
    fn test_known_block_splits() {
        // 5-Q: 2 blocks of 15 and 2 blocks of 16 data codewords, 18 EC each.
        let layout = block_layout(Version::new(5).unwrap(), RecoveryLevel::Quartile);
        assert_eq!(
            layout,
            BlockLayout {
                num_blocks: 4,
                num_short_blocks: 2,
                short_data_len: 15,
                ec_len: 18,
            }
        );
        assert_eq!(data_codewords(Version::MIN, RecoveryLevel::Medium), 16);
        assert_eq!(data_codewords(Version::MIN, RecoveryLevel::Highest), 9);
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_positions(Version::MIN).is_empty());
        assert_eq!(alignment_positions(Version::new(2).unwrap()), &[6, 18]);
        for ver in versions().skip(1) {
            let pos = alignment_positions(ver);
            assert_eq!(pos.len(), usize::from(ver.value()) / 7 + 2);
            assert_eq!(pos[0], 6);
            assert_eq!(usize::from(*pos.last().unwrap()), ver.dimension() - 7);
        }
    }

    #[test]
    fn test_char_count_bits_ranges() {
        let v = |n| Version::new(n).unwrap();
        assert_eq!(char_count_bits(Mode::Numeric, v(9)), 10);
        assert_eq!(char_count_bits(Mode::Numeric, v(10)), 12);
        assert_eq!(char_count_bits(Mode::Alphanumeric, v(26)), 11);
        assert_eq!(char_count_bits(Mode::Alphanumeric, v(27)), 13);
        assert_eq!(char_count_bits(Mode::Byte, v(1)), 8);
        assert_eq!(char_count_bits(Mode::Byte, v(40)), 16);
    }
}
