// High-level compress/decompress API over the transform driver.
//
// Provides:
//   - `Options`: algorithm + scratch buffer size, with library defaults
//   - free functions taking explicit arguments or an `Options`
//   - `Compressible`: the same operations as methods on byte slices

use crate::codec::Algorithm;
use crate::error::CompressionError;
use crate::stream::{self, Operation};

/// Scratch buffer size used when none is given.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for a compress or decompress call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Codec to use. Decompression must use the algorithm that compressed.
    pub algorithm: Algorithm,
    /// Size in bytes of the intermediate output buffer. Affects chunking
    /// only, never the produced bytes.
    pub buffer_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Options {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Compress `input` with `algorithm`, draining output in `buffer_size` chunks.
pub fn compress(
    input: &[u8],
    algorithm: Algorithm,
    buffer_size: usize,
) -> Result<Vec<u8>, CompressionError> {
    stream::transform(input, algorithm, Operation::Compress, buffer_size)
}

/// Decompress `input` that was produced by [`compress`] with the same `algorithm`.
pub fn decompress(
    input: &[u8],
    algorithm: Algorithm,
    buffer_size: usize,
) -> Result<Vec<u8>, CompressionError> {
    stream::transform(input, algorithm, Operation::Decompress, buffer_size)
}

pub fn compress_with_options(input: &[u8], opts: &Options) -> Result<Vec<u8>, CompressionError> {
    compress(input, opts.algorithm, opts.buffer_size)
}

pub fn decompress_with_options(
    input: &[u8],
    opts: &Options,
) -> Result<Vec<u8>, CompressionError> {
    decompress(input, opts.algorithm, opts.buffer_size)
}

// ---------------------------------------------------------------------------
// Extension trait
// ---------------------------------------------------------------------------

/// Compression as methods on byte buffers.
///
/// ```no_run
/// use chunkpress::Compressible;
///
/// let packed = b"some bytes worth packing".compressed().unwrap();
/// let unpacked = packed.decompressed().unwrap();
/// assert_eq!(unpacked, b"some bytes worth packing");
/// ```
pub trait Compressible {
    /// Compress with the default algorithm and buffer size.
    fn compressed(&self) -> Result<Vec<u8>, CompressionError> {
        self.compressed_with(&Options::default())
    }

    fn compressed_with(&self, opts: &Options) -> Result<Vec<u8>, CompressionError>;

    /// Decompress with the default algorithm and buffer size.
    fn decompressed(&self) -> Result<Vec<u8>, CompressionError> {
        self.decompressed_with(&Options::default())
    }

    fn decompressed_with(&self, opts: &Options) -> Result<Vec<u8>, CompressionError>;
}

impl Compressible for [u8] {
    fn compressed_with(&self, opts: &Options) -> Result<Vec<u8>, CompressionError> {
        compress_with_options(self, opts)
    }

    fn decompressed_with(&self, opts: &Options) -> Result<Vec<u8>, CompressionError> {
        decompress_with_options(self, opts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
