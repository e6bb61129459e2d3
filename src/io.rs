// File-level helpers for compressing/decompressing whole files.
//
// Provides `compress_file()` and `decompress_file()`, which read the input
// fully into memory, run the transform, and write the result through a
// `BufWriter`. Optionally computes SHA-256 digests of both sides
// (feature-gated behind `file-io`).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::{Digest, Sha256};

use crate::codec::Algorithm;
use crate::engine::{self, Options};
use crate::error::CompressionError;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()` and `decompress_file()`.
#[derive(Debug, Clone)]
pub struct FileStats {
    /// Algorithm used.
    pub algorithm: Algorithm,
    /// Input file size in bytes.
    pub input_size: u64,
    /// Output file size in bytes.
    pub output_size: u64,
    /// SHA-256 of the input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
    /// SHA-256 of the output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

impl FileStats {
    /// Output size divided by input size.
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        self.output_size as f64 / self.input_size as f64
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Compression or decompression failed.
    #[error(transparent)]
    Compression(#[from] CompressionError),
}

// ---------------------------------------------------------------------------
// compress_file / decompress_file
// ---------------------------------------------------------------------------

/// Compress `input_path` into `output_path`.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    opts: &Options,
) -> Result<FileStats, FileError> {
    let input = fs::read(input_path)?;
    let output = engine::compress_with_options(&input, opts)?;
    write_output(output_path, &output)?;
    Ok(stats(opts.algorithm, &input, &output))
}

/// Decompress `input_path` into `output_path`.
pub fn decompress_file(
    input_path: &Path,
    output_path: &Path,
    opts: &Options,
) -> Result<FileStats, FileError> {
    let input = fs::read(input_path)?;
    let output = engine::decompress_with_options(&input, opts)?;
    write_output(output_path, &output)?;
    Ok(stats(opts.algorithm, &input, &output))
}

fn write_output(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()
}

/// Build stats for a completed transform of `input` into `output`.
pub fn stats(algorithm: Algorithm, input: &[u8], output: &[u8]) -> FileStats {
    FileStats {
        algorithm,
        input_size: input.len() as u64,
        output_size: output.len() as u64,
        input_sha256: sha256(input),
        output_sha256: sha256(output),
    }
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    Some(Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

/// Lowercase hex rendering of a digest.
pub fn hex_digest(digest: &[u8; 32]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
