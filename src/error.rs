//! Error type returned by the encoder.

use thiserror::Error;

/// Result type for encoding operations.
pub type Result<T> = core::result::Result<T, QrError>;

/// Errors a caller can trigger while encoding content.
///
/// Ways to handle this error include:
///
/// - Lower the recovery level if it was greater than `RecoveryLevel::Low`.
/// - Shorten the content, or restrict it to digits or the alphanumeric
///   character set so that it packs more densely.
/// - Propagate the error upward to the caller/user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrError {
    /// The content does not fit any supported version/level combination.
    #[error("content too long to encode: {len} bytes do not fit any supported version")]
    ContentTooLong {
        /// Length of the rejected content in bytes.
        len: usize,
    },
}
