// Streaming codec interface and the built-in codecs.
//
// Every codec is reached through the same three-step protocol:
//
//   init    : `Codec::init` opens a `CodecStream` for one direction
//   process : `CodecStream::process` moves bytes from a source view into a
//              destination slice, reporting progress and OK/END status
//   destroy : dropping the stream releases it
//
// - `registry`: Algorithm -> CodecId -> codec lookup
// - `lz4`     : LZ4 frame format (lz4_flex)
// - `zlib`    : zlib/deflate (flate2)
// - `lzma`    : LZMA alone format (lzma-rs)
// - `lzfse`   : LZFSE block stream (lzfse_rust)
// - `staged`  : input staging / output draining for whole-buffer backends

pub mod lz4;
pub mod lzfse;
pub mod lzma;
pub mod registry;
pub mod zlib;

mod staged;

use std::fmt;

pub use registry::{Algorithm, CodecId, ParseAlgorithmError, codec_for_id, resolve};

// ---------------------------------------------------------------------------
// Stream direction and status
// ---------------------------------------------------------------------------

/// Which way a stream moves bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Raw bytes in, compressed bytes out.
    Encode,
    /// Compressed bytes in, raw bytes out.
    Decode,
}

/// Non-error outcome of a single `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// More work remains; call `process` again.
    Ok,
    /// All input consumed and all output produced.
    End,
}

/// Bytes moved by one `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes taken from the front of the source view.
    pub consumed: usize,
    /// Bytes written to the front of the destination slice.
    pub produced: usize,
    pub status: StreamStatus,
}

impl Progress {
    pub(crate) fn new(consumed: usize, produced: usize, status: StreamStatus) -> Self {
        Self {
            consumed,
            produced,
            status,
        }
    }

    /// True when the call neither consumed nor produced anything.
    pub fn is_idle(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

// ---------------------------------------------------------------------------
// CodecFault
// ---------------------------------------------------------------------------

/// A codec's ERROR status, with the backend's description attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecFault(String);

impl CodecFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodecFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CodecFault {}

// ---------------------------------------------------------------------------
// Codec traits
// ---------------------------------------------------------------------------

/// A codec that can open encode and decode streams.
///
/// Implementations are stateless; all per-call state lives in the
/// [`CodecStream`] returned by [`init`](Codec::init).
pub trait Codec: Send + Sync {
    /// The identifier this codec is registered under.
    fn id(&self) -> CodecId;

    /// Short lowercase name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Open a stream.
    ///
    /// `source` is the full input the stream will be fed. Decoders inspect
    /// its leading bytes and refuse to open when they are not a header of
    /// this codec's format; encoders ignore it.
    fn init(&self, direction: Direction, source: &[u8])
    -> Result<Box<dyn CodecStream>, CodecFault>;
}

/// An open codec stream. Dropping it is the destroy step.
pub trait CodecStream: Send {
    /// Move bytes from `src` into `dst`.
    ///
    /// `finalize` tells the stream that `src` holds the last of the input.
    /// A stream also treats an empty `src` as end of input. The returned
    /// [`Progress`] reports how much of each side was used.
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Progress, CodecFault>;
}
