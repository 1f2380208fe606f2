//! # qrmatrix
//!
//! A Rust library for encoding data into QR code module matrices.
//!
//! `qrmatrix` turns text or binary content into the finished grid of dark and
//! light modules of a QR Code Model 2 symbol. It covers versions 1 to 40 and
//! all four error correction levels, and it leaves rasterizing the grid to the
//! caller.
//!
//! ## Features
//!
//! - Split content into numeric, alphanumeric and byte segments, merging them
//!   where fewer mode switches save bits.
//! - Pick the smallest version holding the content at the requested level.
//! - Compute Reed–Solomon error correction and interleave the blocks.
//! - Score all eight mask patterns and keep the best, or apply a fixed one.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrmatrix = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Print a QR code to the terminal:
//!
//! ```rust
//! use qrmatrix::RecoveryLevel;
//!
//! let matrix = qrmatrix::encode("https://example.com", RecoveryLevel::Medium).unwrap();
//! for row in matrix.rows() {
//!     let line: String = row.iter().map(|&dark| if dark { "██" } else { "  " }).collect();
//!     println!("{}", line);
//! }
//! ```
//!
//! Fix the mask and drop the quiet zone:
//!
//! ```rust
//! use qrmatrix::{EncodeOptions, Mask, QrCode, RecoveryLevel};
//!
//! let options = EncodeOptions::new()
//!     .level(RecoveryLevel::Low)
//!     .quiet_zone(false)
//!     .mask(Some(Mask::new(2)));
//! let qr = QrCode::with_options("01234567", &options).unwrap();
//! assert_eq!(qr.mask(), Mask::new(2));
//! assert_eq!(qr.matrix().size(), 21);
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Version selection, error correction and mask selection.
//! - [`segment`]: Mode segmentation and the per-bracket bitstream encoders.
//! - [`version`]: Versions, recovery levels and the capacity table.
//! - [`reed_solomon`]: GF(256) arithmetic and Reed–Solomon encoding.
//! - [`bits`]: The bit buffer everything is serialised into.

#![forbid(unsafe_code)]

pub mod bits;
pub mod error;
mod layout;
pub mod qrcode;
pub mod reed_solomon;
pub mod segment;
mod symbol;
pub mod version;

pub use crate::error::{QrError, Result};
pub use crate::layout::Mask;
pub use crate::qrcode::{EncodeOptions, Matrix, QrCode};
pub use crate::segment::{DataEncoder, Mode};
pub use crate::version::{RecoveryLevel, Version};

/// Encodes `content` at `level` and returns the finished matrix, quiet zone
/// included.
///
/// # Errors
///
/// Returns [`QrError::ContentTooLong`] if no version holds the content.
pub fn encode(content: impl AsRef<[u8]>, level: RecoveryLevel) -> Result<Matrix> {
    QrCode::new(content, level).map(QrCode::into_matrix)
}
