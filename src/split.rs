//! Naive splitting of content too long for one symbol, and a grid layout for
//! the resulting symbols.
//!
//! Chunks are independent symbols; nothing links them together, so a reader
//! must reassemble them in order.

use image::{imageops, Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{EncodeError, RenderError};
use crate::helper::{self, RenderOptions};
use crate::qrcode::{self, RecoveryLevel, Symbol};

/// Bytes kept free in every chunk below the byte-mode capacity.
pub const SAFETY_MARGIN: usize = 50;

/// Largest chunk, in bytes, produced for `level`.
pub fn chunk_capacity(level: RecoveryLevel) -> usize {
    qrcode::max_byte_capacity(level).saturating_sub(SAFETY_MARGIN)
}

/// Splits `content` into chunks of at most [`chunk_capacity`] bytes.
pub fn split_content(content: &[u8], level: RecoveryLevel) -> Vec<&[u8]> {
    let cap = chunk_capacity(level);
    if cap == 0 {
        return Vec::new();
    }
    content.chunks(cap).collect()
}

/// Splits `content` like [`split_content`], but moves every cut back to a
/// character boundary so no multi-byte character is split.
pub fn split_content_utf8(content: &str, level: RecoveryLevel) -> Vec<&str> {
    let cap = chunk_capacity(level);
    let mut chunks = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let mut end = cap.min(rest.len());
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            break;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Encodes each UTF-8 chunk of `content` as its own symbol, in chunk order.
pub fn encode_multi(content: &str, level: RecoveryLevel) -> Result<Vec<Symbol>, EncodeError> {
    let chunks = split_content_utf8(content, level);
    debug!(chunks = chunks.len(), bytes = content.len(), "encoding split content");
    chunks
        .par_iter()
        .map(|chunk| qrcode::encode_text(chunk, level))
        .collect()
}

/// Lays the symbols out row-major in a grid, each rendered as by
/// [`helper::to_image`] with `size`. `cols == 0` picks a square-ish layout.
/// No symbols give a 0x0 image.
pub fn grid_image(
    symbols: &[Symbol],
    size: i32,
    cols: usize,
    options: &RenderOptions,
) -> Result<RgbaImage, RenderError> {
    let n = symbols.len();
    if n == 0 {
        return Ok(RgbaImage::new(0, 0));
    }
    let cols = if cols == 0 {
        (n as f64).sqrt().ceil() as usize
    } else {
        cols.min(n)
    };
    let rows = n.div_ceil(cols);

    let images = symbols
        .par_iter()
        .map(|symbol| helper::to_image(symbol, size, options))
        .collect::<Result<Vec<_>, _>>()?;
    let cell = images.iter().map(|img| img.width()).max().unwrap_or(0);
    let width = u32::try_from(cols)
        .ok()
        .and_then(|c| c.checked_mul(cell))
        .ok_or(RenderError::InvalidSize(size))?;
    let height = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(cell))
        .ok_or(RenderError::InvalidSize(size))?;

    let mut dst = RgbaImage::from_pixel(width, height, Rgba(options.background));
    for (i, img) in images.iter().enumerate() {
        let x = (i % cols) as i64 * i64::from(cell);
        let y = (i / cols) as i64 * i64::from(cell);
        imageops::replace(&mut dst, img, x, y);
    }
    debug!(symbols = n, cols, rows, cell, "rendered grid");
    Ok(dst)
}

/// [`grid_image`] as PNG bytes.
pub fn grid_png(
    symbols: &[Symbol],
    size: i32,
    cols: usize,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    helper::encode_png(&grid_image(symbols, size, cols, options)?)
}
