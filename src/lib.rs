//! # qrsmith
//!
//! A Rust library for encoding text or binary data into QR Code symbols.
//!
//! `qrsmith` follows the QR Code Model 2 specification (ISO/IEC 18004). It supports
//! versions 1 to 40, four error correction levels and the numeric, alphanumeric and
//! byte modes. The encoder core produces a [`Symbol`], a finished grid of dark and
//! light modules; rendering to text art, SVG or PNG lives in [`helper`].
//!
//! ## Features
//!
//! - Automatic mode and smallest-version selection.
//! - Reed-Solomon error correction over GF(256) with block interleaving.
//! - Penalty-scored mask selection, parallel for large symbols.
//! - Rendering as text art, SVG, in-memory image buffers or PNG files.
//! - Naive splitting of oversized content across several symbols.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrsmith = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qrsmith::{encode_text, helper, RecoveryLevel, RenderOptions};
//!
//! let symbol = encode_text("HELLO WORLD", RecoveryLevel::Medium).unwrap();
//! assert_eq!(symbol.dimension(), 21);
//!
//! let img = helper::to_image(&symbol, 256, &RenderOptions::default()).unwrap();
//! assert_eq!(img.dimensions(), (256, 256));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding functionality.
//! - [`helper`]: Utilities for rendering symbols in various formats.
//! - [`split`]: Splitting long content over several symbols.
//! - [`error`]: Error types.
//! - [`config`]: Process-wide tuning read from the environment.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod helper;
pub mod qrcode;
pub mod split;

pub use error::{EncodeError, RenderError};
pub use helper::RenderOptions;
pub use qrcode::{
    encode, encode_text, encode_with, max_byte_capacity, EncodeOptions, Mask, Mode, RecoveryLevel,
    Symbol, Version,
};
