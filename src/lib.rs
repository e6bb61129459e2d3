//! Chunkpress: one-call chunked streaming compression in Rust.
//!
//! The crate provides:
//! - A codec registry mapping algorithm classes to concrete codecs (`codec`)
//! - A chunked transform driver over a fixed-size scratch buffer (`stream`)
//! - High-level compress/decompress APIs (`engine`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use chunkpress::{Algorithm, compress, decompress};
//!
//! let data = b"hello hello hello hello hello";
//! let packed = compress(data, Algorithm::Balanced, 4096).unwrap();
//! let unpacked = decompress(&packed, Algorithm::Balanced, 4096).unwrap();
//! assert_eq!(unpacked, data);
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod io;
pub mod stream;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{Algorithm, CodecId};
pub use engine::{
    Compressible, DEFAULT_BUFFER_SIZE, Options, compress, compress_with_options, decompress,
    decompress_with_options,
};
pub use error::CompressionError;
pub use stream::{Operation, transform};
