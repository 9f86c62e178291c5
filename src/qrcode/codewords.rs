//! Splits data codewords into blocks, appends Reed-Solomon EC codewords to
//! each and interleaves the result into the final codeword stream.

use super::reed_solomon;
use super::tables::{self, BlockLayout};
use super::{RecoveryLevel, Version};

/// Interleaves `data` (exactly the data capacity of `ver` at `level`) with its
/// EC codewords. The result has [`tables::total_codewords`] entries.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, level: RecoveryLevel) -> Vec<u8> {
    assert_eq!(data.len(), tables::data_codewords(ver, level));
    let layout: BlockLayout = tables::block_layout(ver, level);

    let mut blocks: Vec<&[u8]> = Vec::with_capacity(layout.num_blocks);
    let mut eccs: Vec<Vec<u8>> = Vec::with_capacity(layout.num_blocks);
    let mut dat: &[u8] = data;
    for i in 0..layout.num_blocks {
        let (block, rest) = dat.split_at(layout.data_len(i));
        eccs.push(reed_solomon::ec_codewords(block, layout.ec_len));
        blocks.push(block);
        dat = rest;
    }
    debug_assert!(dat.is_empty());

    let mut result = Vec::with_capacity(tables::total_codewords(ver));
    // Short blocks run out one index before the long ones.
    for j in 0..=layout.short_data_len {
        for block in &blocks {
            if let Some(&b) = block.get(j) {
                result.push(b);
            }
        }
    }
    for j in 0..layout.ec_len {
        for ecc in &eccs {
            result.push(ecc[j]);
        }
    }
    debug_assert_eq!(result.len(), tables::total_codewords(ver));
    result
}
