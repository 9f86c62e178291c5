//! The module grid under construction: function patterns, reserved
//! metadata areas and the zigzag placement of codeword bits.

use super::format;
use super::tables;
use super::Version;
use crate::error::EncodeError;

/// A square grid of modules, each either reserved (function pattern or
/// metadata) or free for data.
#[derive(Clone, Debug)]
pub struct Matrix {
    version: Version,
    size: usize,
    dark: Vec<bool>,
    reserved: Vec<bool>,
}

impl Matrix {
    /// An all-light, all-free grid for `ver`.
    pub fn new(ver: Version) -> Self {
        let size = ver.dimension();
        Self {
            version: ver,
            size,
            dark: vec![false; size * size],
            reserved: vec![false; size * size],
        }
    }

    /// A grid for `ver` with every function pattern stamped and every
    /// metadata area reserved. Version information is already written.
    pub fn with_function_patterns(ver: Version) -> Self {
        let mut result = Self::new(ver);
        result.draw_finder_patterns();
        result.draw_timing_patterns();
        result.draw_alignment_patterns(tables::alignment_positions(ver));
        result.reserve_format_areas();
        if ver.value() >= 7 {
            format::draw_version_bits(&mut result, ver);
        }
        result
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.dark[row * self.size + col]
    }

    pub fn is_reserved(&self, row: usize, col: usize) -> bool {
        self.reserved[row * self.size + col]
    }

    /// Sets a module's colour without changing its reservation.
    pub fn set(&mut self, row: usize, col: usize, isdark: bool) {
        self.dark[row * self.size + col] = isdark;
    }

    /// Sets a module's colour and marks it as a function module.
    pub fn set_function(&mut self, row: usize, col: usize, isdark: bool) {
        let index = row * self.size + col;
        self.dark[index] = isdark;
        self.reserved[index] = true;
    }

    fn set_function_unbounded(&mut self, row: i32, col: i32, isdark: bool) {
        let range = 0..self.size as i32;
        if range.contains(&row) && range.contains(&col) {
            self.set_function(row as usize, col as usize, isdark);
        }
    }

    /// Number of modules not claimed by any function pattern or metadata area.
    pub fn free_modules(&self) -> usize {
        self.reserved.iter().filter(|&&r| !r).count()
    }

    pub(crate) fn into_modules(self) -> Vec<bool> {
        self.dark
    }

    /// Finder patterns with their light separators, at every corner but the
    /// bottom-right.
    fn draw_finder_patterns(&mut self) {
        let far = self.size as i32 - 4;
        for (crow, ccol) in [(3, 3), (3, far), (far, 3)] {
            for dy in -4i32..=4 {
                for dx in -4i32..=4 {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function_unbounded(crow + dy, ccol + dx, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        for i in 0..self.size {
            if !self.is_reserved(6, i) {
                self.set_function(6, i, i % 2 == 0);
            }
            if !self.is_reserved(i, 6) {
                self.set_function(i, 6, i % 2 == 0);
            }
        }
    }

    fn draw_alignment_patterns(&mut self, positions: &[u8]) {
        let last = positions.len().saturating_sub(1);
        for (i, &row) in positions.iter().enumerate() {
            for (j, &col) in positions.iter().enumerate() {
                // These three would sit on a finder pattern.
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                for dy in -2i32..=2 {
                    for dx in -2i32..=2 {
                        let dist = dx.abs().max(dy.abs());
                        self.set_function_unbounded(
                            i32::from(row) + dy,
                            i32::from(col) + dx,
                            dist != 1,
                        );
                    }
                }
            }
        }
    }

    /// Reserves both format strips, the version blocks (version 7 and up)
    /// and sets the dark module.
    fn reserve_format_areas(&mut self) {
        let size = self.size;
        for i in 0..9 {
            if !self.is_reserved(8, i) {
                self.set_function(8, i, false);
            }
            if !self.is_reserved(i, 8) {
                self.set_function(i, 8, false);
            }
        }
        for i in 0..8 {
            self.set_function(8, size - 1 - i, false);
        }
        for i in 0..7 {
            self.set_function(size - 1 - i, 8, false);
        }
        if self.version.value() >= 7 {
            for i in 0..6 {
                for j in 0..3 {
                    self.set_function(i, size - 11 + j, false);
                    self.set_function(size - 11 + j, i, false);
                }
            }
        }
        self.set_function(size - 8, 8, true);
    }

    /// Places the interleaved codewords into the free modules in zigzag
    /// order: two-column strips from the right edge, alternating upward and
    /// downward, skipping the vertical timing column. Free modules left after
    /// the last codeword are the remainder bits and stay light.
    pub fn draw_codewords(&mut self, data: &[u8], remainder_bits: usize) -> Result<(), EncodeError> {
        let needed = data.len() * 8 + remainder_bits;
        let available = self.free_modules();
        if needed != available {
            return Err(EncodeError::matrix_mismatch(needed, available));
        }

        let size = self.size as i32;
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let row = (if upward { size - 1 - vert } else { vert }) as usize;
                for j in 0..2 {
                    let col = (right - j) as usize;
                    if !self.is_reserved(row, col) && i < data.len() * 8 {
                        let bit = (data[i >> 3] >> (7 - (i & 7))) & 1 != 0;
                        self.set(row, col, bit);
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_free_modules_match_capacity_tables() {
        for n in 1..=40u8 {
            let ver = v(n);
            let m = Matrix::with_function_patterns(ver);
            assert_eq!(
                m.free_modules(),
                tables::total_codewords(ver) * 8 + tables::remainder_bits(ver),
                "version {}",
                n
            );
        }
    }

    #[test]
    fn test_finder_and_separator() {
        let m = Matrix::with_function_patterns(v(1));
        let expected = [
            "#######.", "#.....#.", "#.###.#.", "#.###.#.", "#.###.#.", "#.....#.", "#######.",
            "........",
        ];
        for (row, line) in expected.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                assert_eq!(m.get(row, col), c == '#', "top-left ({}, {})", row, col);
                assert_eq!(m.get(row, 20 - col), c == '#', "top-right ({}, {})", row, col);
                assert_eq!(m.get(20 - row, col), c == '#', "bottom-left ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_timing_and_dark_module() {
        let m = Matrix::with_function_patterns(v(3));
        let size = m.size();
        for i in 8..size - 8 {
            assert_eq!(m.get(6, i), i % 2 == 0);
            assert_eq!(m.get(i, 6), i % 2 == 0);
            assert!(m.is_reserved(6, i) && m.is_reserved(i, 6));
        }
        assert!(m.get(size - 8, 8));
        assert!(m.is_reserved(size - 8, 8));
    }

    #[test]
    fn test_alignment_pattern_skips_finders() {
        let m = Matrix::with_function_patterns(v(7));
        // Centres at 6, 22, 38: (22, 22) drawn, (6, 6) left to the finder.
        assert!(m.get(22, 22));
        assert!(!m.get(22, 21) && !m.get(21, 22));
        assert!(m.get(20, 20) && m.get(24, 24));
        assert!(m.get(6, 6));
        assert!(!m.get(6, 7));
        // (6, 22) overlaps the timing row, so both agree there.
        assert!(m.get(6, 22) && !m.get(6, 21) && m.get(6, 20));
        assert!(!m.get(5, 22));
    }

    #[test]
    fn test_version_blocks_reserved_only_from_version_7() {
        let small = Matrix::with_function_patterns(v(6));
        let size = small.size();
        assert!(!small.is_reserved(0, size - 11));
        let large = Matrix::with_function_patterns(v(7));
        let size = large.size();
        assert!(large.is_reserved(0, size - 11));
        assert!(large.is_reserved(size - 11, 5));
    }

    #[test]
    fn test_codeword_count_mismatch_is_rejected() {
        let ver = v(1);
        let mut m = Matrix::with_function_patterns(ver);
        let err = m.draw_codewords(&[0u8; 27], 0).err().unwrap();
        assert_eq!(
            err,
            EncodeError::MatrixOverflow {
                needed: 216,
                available: 208
            }
        );
        let err = m.draw_codewords(&[0u8; 25], 0).err().unwrap();
        assert!(matches!(err, EncodeError::MatrixUnderflow { .. }));
    }

    #[test]
    fn test_zigzag_starts_bottom_right_going_up() {
        let ver = v(1);
        let mut m = Matrix::with_function_patterns(ver);
        let mut data = vec![0u8; 26];
        data[0] = 0b1010_0000;
        m.draw_codewords(&data, 0).unwrap();
        // Bits 0..4 go to (20,20), (20,19), (19,20), (19,19).
        assert!(m.get(20, 20));
        assert!(!m.get(20, 19));
        assert!(m.get(19, 20));
        assert!(!m.get(19, 19));
    }
}
