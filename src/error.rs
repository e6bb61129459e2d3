// Error taxonomy for the transform driver.
//
// Every variant is terminal: the driver never retries, and a failed call
// yields no partial output.

use crate::codec::{Algorithm, CodecFault};

/// Error returned by [`transform`](crate::stream::transform) and the
/// engine-level `compress`/`decompress` helpers.
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    /// The input buffer was empty. Raised before any codec interaction.
    #[error("input data is empty")]
    EmptyData,

    /// The scratch buffer size was zero. Raised before any codec interaction.
    #[error("invalid buffer size {0}: must be at least one byte")]
    InvalidBufferSize(usize),

    /// The codec refused to open a stream.
    ///
    /// This is also what decompressing with the wrong algorithm, or
    /// decompressing data that was never compressed, looks like: the codecs
    /// are not self-describing, so the two cases cannot be told apart.
    #[error("{algorithm} stream initialization failed: {reason}")]
    InitError {
        algorithm: Algorithm,
        reason: CodecFault,
    },

    /// The codec failed mid-stream (corrupt or truncated input, internal fault).
    #[error("{algorithm} stream processing failed: {reason}")]
    ProcessError {
        algorithm: Algorithm,
        reason: CodecFault,
    },
}

impl CompressionError {
    /// Whether the error was raised before any codec resource was acquired.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyData | Self::InvalidBufferSize(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
