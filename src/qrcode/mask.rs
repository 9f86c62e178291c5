//! Mask patterns, penalty scoring and mask selection.

use rayon::prelude::*;
use tracing::{debug, trace};

use super::format;
use super::matrix::Matrix;
use super::{Mask, RecoveryLevel};
use crate::config;

const PENALTY_N1: u32 = 3;
const PENALTY_N2: u32 = 3;
const PENALTY_N3: u32 = 40;
const PENALTY_N4: u32 = 10;

/// Whether `mask` inverts the module at (row, col).
pub fn inverts(mask: Mask, row: usize, col: usize) -> bool {
    let (i, j) = (row, col);
    match mask.value() {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        7 => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        _ => unreachable!(),
    }
}

impl Matrix {
    /// XORs `mask` into every free module. Applying the same mask twice
    /// restores the original.
    pub fn apply_mask(&mut self, mask: Mask) {
        let size = self.size();
        for row in 0..size {
            for col in 0..size {
                if !self.is_reserved(row, col) && inverts(mask, row, col) {
                    let isdark = self.get(row, col);
                    self.set(row, col, !isdark);
                }
            }
        }
    }
}

/// The four penalty rules, scored separately.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Penalty {
    /// Runs of five or more same-coloured modules in a row or column.
    pub runs: u32,
    /// 2x2 blocks of one colour.
    pub blocks: u32,
    /// Finder-like 1:1:3:1:1 patterns with a light border.
    pub finders: u32,
    /// Distance of the dark ratio from one half.
    pub balance: u32,
}

impl Penalty {
    pub fn total(&self) -> u32 {
        self.runs + self.blocks + self.finders + self.balance
    }
}

/// Scores the whole grid, function patterns included.
pub fn penalty(matrix: &Matrix) -> Penalty {
    let size = matrix.size();
    let mut result = Penalty::default();

    for row in 0..size {
        let (runs, finders) = score_line((0..size).map(|col| matrix.get(row, col)), size);
        result.runs += runs;
        result.finders += finders;
    }
    for col in 0..size {
        let (runs, finders) = score_line((0..size).map(|row| matrix.get(row, col)), size);
        result.runs += runs;
        result.finders += finders;
    }

    for row in 0..size - 1 {
        for col in 0..size - 1 {
            let color = matrix.get(row, col);
            if color == matrix.get(row, col + 1)
                && color == matrix.get(row + 1, col)
                && color == matrix.get(row + 1, col + 1)
            {
                result.blocks += PENALTY_N2;
            }
        }
    }

    let dark = (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .filter(|&(row, col)| matrix.get(row, col))
        .count();
    result.balance = balance_penalty(dark, size * size);
    result
}

/// `10 * floor(|dark% - 50| / 5)`, in integer arithmetic.
fn balance_penalty(dark: usize, total: usize) -> u32 {
    let deviation = (dark * 100).abs_diff(total * 50);
    (deviation / (5 * total)) as u32 * PENALTY_N4
}

/// Run and finder penalties for one row or column.
fn score_line<I: Iterator<Item = bool>>(cells: I, size: usize) -> (u32, u32) {
    let mut runs: u32 = 0;
    let mut finders: u32 = 0;
    let mut runcolor = false;
    let mut runlen: i32 = 0;
    let mut runhistory = FinderPenalty::new(size);
    for color in cells {
        if color == runcolor {
            runlen += 1;
            if runlen == 5 {
                runs += PENALTY_N1;
            } else if runlen > 5 {
                runs += 1;
            }
        } else {
            runhistory.add_history(runlen);
            if !runcolor {
                finders += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = color;
            runlen = 1;
        }
    }
    finders += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
    (runs, finders)
}

/// The last seven run lengths of a line, newest first. The area outside the
/// symbol counts as light.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            qr_size: size as i32,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size;
        }
        let len = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// 1 if the history ends in dark n, light n, dark 3n, light n, dark n
    /// with 4n light on at least one side.
    fn count_patterns(&self) -> u32 {
        let rh = &self.run_history;
        let n = rh[1];
        u32::from(
            n > 0
                && rh[2] == n
                && rh[3] == n * 3
                && rh[4] == n
                && rh[5] == n
                && (rh[0] >= n * 4 || rh[6] >= n * 4),
        )
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> u32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

/// Total penalty of `matrix` with `mask` applied and its format bits drawn.
/// Works on a private copy.
fn trial_penalty(matrix: &Matrix, level: RecoveryLevel, mask: Mask) -> u32 {
    let mut trial = matrix.clone();
    trial.apply_mask(mask);
    format::draw_format_bits(&mut trial, level, mask);
    let score = penalty(&trial);
    trace!(mask = mask.value(), ?score, total = score.total(), "mask penalty");
    score.total()
}

/// Scores all eight masks against the unmasked `matrix` and returns the one
/// with the lowest penalty; the lowest mask id wins ties. `matrix` is left
/// untouched.
pub fn choose_mask(matrix: &Matrix, level: RecoveryLevel) -> Mask {
    let parallel = matrix.version().value() >= config::parallel_mask_min_version();
    choose_mask_with(matrix, level, parallel)
}

/// [`choose_mask`] with the trial strategy given explicitly. Both strategies
/// pick the same mask.
fn choose_mask_with(matrix: &Matrix, level: RecoveryLevel, parallel: bool) -> Mask {
    let scores: Vec<u32> = if parallel {
        Mask::ALL[..]
            .par_iter()
            .map(|&mask| trial_penalty(matrix, level, mask))
            .collect()
    } else {
        // One scratch copy, masked and unmasked in turn.
        let mut scratch = matrix.clone();
        Mask::ALL
            .iter()
            .map(|&mask| {
                scratch.apply_mask(mask);
                format::draw_format_bits(&mut scratch, level, mask);
                let score = penalty(&scratch);
                trace!(mask = mask.value(), ?score, total = score.total(), "mask penalty");
                scratch.apply_mask(mask);
                score.total()
            })
            .collect()
    };

    let mut best = Mask::ALL[0];
    let mut minpenalty = u32::MAX;
    for (&mask, &score) in Mask::ALL.iter().zip(scores.iter()) {
        if score < minpenalty {
            best = mask;
            minpenalty = score;
        }
    }
    debug!(mask = best.value(), penalty = minpenalty, parallel, "selected mask");
    best
}
