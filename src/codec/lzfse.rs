// LZFSE codec (lzfse_rust).
//
// Uses the buffered engine (`encode_bytes` / `decode_bytes`) behind the
// staged stream adapter.

use super::staged::{PendingOutput, StagedInput};
use super::{Codec, CodecFault, CodecId, CodecStream, Direction, Progress, StreamStatus};

/// Every LZFSE block begins with `bvx` followed by a block-type byte.
const BLOCK_PREFIX: &[u8; 3] = b"bvx";

/// Block types: uncompressed, v1, v2, LZVN, end of stream.
const BLOCK_TYPES: &[u8; 5] = b"-12n$";

/// LZFSE codec (ID 0x801).
#[derive(Debug, Clone, Copy, Default)]
pub struct LzfseCodec;

impl Codec for LzfseCodec {
    fn id(&self) -> CodecId {
        CodecId::Lzfse
    }

    fn name(&self) -> &'static str {
        "lzfse"
    }

    fn init(
        &self,
        direction: Direction,
        source: &[u8],
    ) -> Result<Box<dyn CodecStream>, CodecFault> {
        if direction == Direction::Decode {
            check_header(source)?;
        }
        Ok(Box::new(LzfseStream {
            direction,
            staged: StagedInput::default(),
            pending: PendingOutput::default(),
            ran: false,
        }))
    }
}

/// Check that the input opens with an LZFSE block magic.
pub fn check_header(source: &[u8]) -> Result<(), CodecFault> {
    match source.first_chunk::<4>() {
        Some([b'b', b'v', b'x', kind]) if BLOCK_TYPES.contains(kind) => Ok(()),
        Some(magic) if magic.starts_with(BLOCK_PREFIX) => Err(CodecFault::new(format!(
            "unknown LZFSE block type {:?}",
            char::from(magic[3])
        ))),
        Some(_) => Err(CodecFault::new("not an LZFSE stream")),
        None => Err(CodecFault::new("input too short for an LZFSE block header")),
    }
}

/// Size of the v1 compressed block header, frequency tables included.
const V1_HEADER_LEN: usize = 772;

/// Byte length of the block stream up to and including its `bvx$` marker.
///
/// Walks block headers without decoding payloads. `None` when the layout
/// does not parse; the decoder reports the precise failure in that case.
pub fn stream_len(source: &[u8]) -> Option<usize> {
    let u32_at = |pos: usize| -> Option<usize> {
        let bytes = source.get(pos..pos + 4)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?) as usize)
    };
    let u64_at = |pos: usize| -> Option<u64> {
        let bytes = source.get(pos..pos + 8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    };
    let field = |v: u64, offset: u32, bits: u32| ((v >> offset) & ((1u64 << bits) - 1)) as usize;

    let mut pos = 0;
    loop {
        let magic = source.get(pos..pos + 4)?;
        if &magic[..3] != BLOCK_PREFIX {
            return None;
        }
        let block_len = match magic[3] {
            b'$' => return Some(pos + 4),
            b'-' => 8 + u32_at(pos + 4)?,
            b'n' => 12 + u32_at(pos + 8)?,
            b'1' => V1_HEADER_LEN + u32_at(pos + 20)? + u32_at(pos + 24)?,
            b'2' => {
                let literal_payload = field(u64_at(pos + 8)?, 20, 20);
                let lmd_payload = field(u64_at(pos + 16)?, 40, 20);
                let header_len = field(u64_at(pos + 24)?, 0, 32);
                header_len + literal_payload + lmd_payload
            }
            _ => return None,
        };
        pos = pos.checked_add(block_len)?;
    }
}

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

struct LzfseStream {
    direction: Direction,
    staged: StagedInput,
    pending: PendingOutput,
    ran: bool,
}

impl LzfseStream {
    fn run_backend(&mut self) -> Result<(), CodecFault> {
        let input = self.staged.take();
        let mut output = Vec::new();
        match self.direction {
            Direction::Encode => {
                lzfse_rust::encode_bytes(&input, &mut output)
                    .map_err(|e| CodecFault::new(format!("lzfse encode failed: {e}")))?;
            }
            Direction::Decode => {
                if let Some(end) = stream_len(&input)
                    && end < input.len()
                {
                    return Err(CodecFault::new(format!(
                        "{} trailing bytes after the end of the LZFSE stream",
                        input.len() - end
                    )));
                }
                lzfse_rust::decode_bytes(&input, &mut output)
                    .map_err(|e| CodecFault::new(format!("lzfse decode failed: {e}")))?;
            }
        }
        self.pending.set(output);
        self.ran = true;
        Ok(())
    }
}

impl CodecStream for LzfseStream {
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
        if !self.ran {
            self.run_backend()?;
        }

        let produced = self.pending.drain_into(dst);
        let status = if self.pending.is_empty() {
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
