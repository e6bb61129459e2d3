// Chunked transform driver.
//
// Feeds an entire in-memory input to a codec stream and drains output
// through a fixed-size scratch buffer until the codec reports END:
//
// - `context`    : StreamContext (codec stream + cursors), ScratchBuffer
// - `accumulator`: OutputAccumulator collecting flushed chunks

pub mod accumulator;
pub mod context;

use log::{debug, trace};

use crate::codec::{self, Algorithm, Direction, StreamStatus};
use crate::error::CompressionError;

pub use accumulator::OutputAccumulator;
pub use context::{ScratchBuffer, StreamContext};

/// Transform direction requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    pub fn direction(self) -> Direction {
        match self {
            Self::Compress => Direction::Encode,
            Self::Decompress => Direction::Decode,
        }
    }

    /// Compression sees the whole input up front and can finalize at once.
    /// Decoders find the end of input from the stream itself.
    pub fn finalize(self) -> bool {
        matches!(self, Self::Compress)
    }
}

/// Compress or decompress `input` in one call.
///
/// Output is produced in `buffer_size` chunks through a scratch buffer and
/// collected into the returned vector. On failure no partial output is
/// returned, and the codec stream is released on every path.
pub fn transform(
    input: &[u8],
    algorithm: Algorithm,
    operation: Operation,
    buffer_size: usize,
) -> Result<Vec<u8>, CompressionError> {
    if input.is_empty() {
        return Err(CompressionError::EmptyData);
    }
    if buffer_size == 0 {
        return Err(CompressionError::InvalidBufferSize(buffer_size));
    }

    let codec = codec::codec_for_id(codec::resolve(algorithm));
    let finalize = operation.finalize();

    debug!(
        "{operation:?} {} bytes with {} (codec {}), buffer {buffer_size}",
        input.len(),
        algorithm,
        codec.id()
    );

    let mut scratch = ScratchBuffer::new(buffer_size);
    let stream = codec
        .init(operation.direction(), input)
        .map_err(|reason| {
            debug!("{algorithm} init failed: {reason}");
            CompressionError::InitError { algorithm, reason }
        })?;
    let mut ctx = StreamContext::new(stream, input, &mut scratch);
    let mut output = OutputAccumulator::with_capacity(buffer_size);

    loop {
        match ctx.process(finalize) {
            Ok(StreamStatus::Ok) => {
                if ctx.dst_remaining() == 0 {
                    trace!("flush full chunk #{}", output.chunks() + 1);
                    output.append(ctx.written());
                    ctx.rewind();
                }
            }
            Ok(StreamStatus::End) => {
                if !ctx.written().is_empty() {
                    trace!("flush final chunk of {} bytes", ctx.written().len());
                    output.append(ctx.written());
                }
                break;
            }
            Err(reason) => {
                debug!(
                    "{algorithm} process failed after {} calls: {reason}",
                    ctx.calls()
                );
                return Err(CompressionError::ProcessError { algorithm, reason });
            }
        }
    }

    debug!(
        "{operation:?} done: {} -> {} bytes in {} chunks, {} process calls",
        input.len(),
        output.len(),
        output.chunks(),
        ctx.calls()
    );
    drop(ctx);
    Ok(output.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
