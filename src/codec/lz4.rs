// LZ4 codec in the LZ4 frame format (lz4_flex).
//
// Encoding pushes source bytes through a `FrameEncoder<Vec<u8>>` and drains
// whatever the encoder has emitted into the destination. Decoding stages the
// frame until end of input, then pulls decoded bytes straight into the
// destination through a `FrameDecoder`.

use std::io::{self, Cursor, Read, Write};

use lz4_flex::frame::{FrameDecoder, FrameEncoder};

use super::staged::{PendingOutput, StagedInput};
use super::{Codec, CodecFault, CodecId, CodecStream, Direction, Progress, StreamStatus};

/// LZ4 frame magic number (little-endian on the wire).
pub const FRAME_MAGIC: u32 = 0x184D_2204;

/// LZ4 codec (ID 0x100).
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn id(&self) -> CodecId {
        CodecId::Lz4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn init(
        &self,
        direction: Direction,
        source: &[u8],
    ) -> Result<Box<dyn CodecStream>, CodecFault> {
        match direction {
            Direction::Encode => Ok(Box::new(Lz4EncodeStream {
                encoder: Some(FrameEncoder::new(Vec::new())),
                pending: PendingOutput::default(),
            })),
            Direction::Decode => {
                check_header(source)?;
                Ok(Box::new(Lz4DecodeStream {
                    staged: StagedInput::default(),
                    decoder: None,
                    finished: false,
                }))
            }
        }
    }
}

/// Check for the LZ4 frame magic number.
pub fn check_header(source: &[u8]) -> Result<(), CodecFault> {
    match source.first_chunk::<4>() {
        Some(magic) if u32::from_le_bytes(*magic) == FRAME_MAGIC => Ok(()),
        Some(magic) => Err(CodecFault::new(format!(
            "not an LZ4 frame (magic {:#010x})",
            u32::from_le_bytes(*magic)
        ))),
        None => Err(CodecFault::new("input too short for an LZ4 frame header")),
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

struct Lz4EncodeStream {
    /// `None` once the frame has been finished.
    encoder: Option<FrameEncoder<Vec<u8>>>,
    pending: PendingOutput,
}

impl CodecStream for Lz4EncodeStream {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Progress, CodecFault> {
        let mut consumed = 0;

        if let Some(encoder) = self.encoder.as_mut() {
            encoder
                .write_all(src)
                .map_err(|e| CodecFault::new(format!("lz4 encode failed: {e}")))?;
            consumed = src.len();
            let emitted = std::mem::take(encoder.get_mut());
            self.pending.push(&emitted);

            if finalize || src.is_empty() {
                if let Some(encoder) = self.encoder.take() {
                    let tail = encoder
                        .finish()
                        .map_err(|e| CodecFault::new(format!("lz4 finish failed: {e}")))?;
                    self.pending.push(&tail);
                }
            }
        }

        let produced = self.pending.drain_into(dst);
        let status = if self.encoder.is_none() && self.pending.is_empty() {
            StreamStatus::End
        } else {
            StreamStatus::Ok
        };
        Ok(Progress::new(consumed, produced, status))
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

struct Lz4DecodeStream {
    staged: StagedInput,
    decoder: Option<FrameDecoder<Cursor<Vec<u8>>>>,
    finished: bool,
}

impl CodecStream for Lz4DecodeStream {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Progress, CodecFault> {
        let consumed = self.staged.absorb(src, finalize);
        if !self.staged.is_sealed() {
            return Ok(Progress::new(consumed, 0, StreamStatus::Ok));
        }

        let decoder = self
            .decoder
            .get_or_insert_with(|| FrameDecoder::new(Cursor::new(self.staged.take())));

        let mut produced = 0;
        while produced < dst.len() && !self.finished {
            match decoder.read(&mut dst[produced..]) {
                Ok(0) => {
                    let cursor = decoder.get_ref();
                    let trailing = cursor.get_ref().len() as u64 - cursor.position();
                    if trailing > 0 {
                        return Err(CodecFault::new(format!(
                            "{trailing} trailing bytes after the end of the LZ4 frame"
                        )));
                    }
                    self.finished = true;
                }
                Ok(n) => produced += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(CodecFault::new(format!("lz4 decode failed: {e}"))),
            }
        }

        let status = if self.finished {
            StreamStatus::End
        } else {
            StreamStatus::Ok
        };
        Ok(Progress::new(consumed, produced, status))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
