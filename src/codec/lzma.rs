// LZMA codec in the LZMA "alone" format (lzma-rs).
//
// lzma-rs exposes whole-buffer encode/decode, so both directions stage the
// source and serve the backend's output through `PendingOutput`.

use std::io;

use super::staged::{PendingOutput, StagedInput};
use super::{Codec, CodecFault, CodecId, CodecStream, Direction, Progress, StreamStatus};

/// Properties byte + dictionary size + uncompressed size.
pub const HEADER_LEN: usize = 13;

/// lc/lp/pb combinations encode to values below 9 * 5 * 5.
const MAX_PROPERTIES: u8 = 9 * 5 * 5;

/// Largest declared uncompressed size accepted when the size is known.
const MAX_DECLARED_SIZE: u64 = 1 << 38;

/// LZMA codec (ID 0x306).
#[derive(Debug, Clone, Copy, Default)]
pub struct LzmaCodec;

impl Codec for LzmaCodec {
    fn id(&self) -> CodecId {
        CodecId::Lzma
    }

    fn name(&self) -> &'static str {
        "lzma"
    }

    fn init(
        &self,
        direction: Direction,
        source: &[u8],
    ) -> Result<Box<dyn CodecStream>, CodecFault> {
        if direction == Direction::Decode {
            check_header(source)?;
        }
        Ok(Box::new(LzmaStream {
            direction,
            staged: StagedInput::default(),
            pending: PendingOutput::default(),
            ran: false,
        }))
    }
}

/// Validate the 13-byte LZMA alone header.
pub fn check_header(source: &[u8]) -> Result<(), CodecFault> {
    let Some(header) = source.first_chunk::<HEADER_LEN>() else {
        return Err(CodecFault::new("input too short for an LZMA header"));
    };

    let properties = header[0];
    if properties >= MAX_PROPERTIES {
        return Err(CodecFault::new(format!(
            "invalid LZMA properties byte {properties:#04x}"
        )));
    }

    let dict_size = u32::from_le_bytes([header[1], header[2], header[3], header[4]]);
    if !is_valid_dict_size(dict_size) {
        return Err(CodecFault::new(format!(
            "invalid LZMA dictionary size {dict_size:#x}"
        )));
    }

    let mut size_bytes = [0u8; 8];
    size_bytes.copy_from_slice(&header[5..HEADER_LEN]);
    let declared = u64::from_le_bytes(size_bytes);
    if declared != u64::MAX && declared >= MAX_DECLARED_SIZE {
        return Err(CodecFault::new(format!(
            "implausible LZMA uncompressed size {declared}"
        )));
    }
    Ok(())
}

/// Encoders only write 2^n or 2^n + 2^(n-1), or all ones.
fn is_valid_dict_size(size: u32) -> bool {
    if size == u32::MAX {
        return true;
    }
    match size.count_ones() {
        1 => true,
        2 => size >> size.trailing_zeros() == 0b11,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

struct LzmaStream {
    direction: Direction,
    staged: StagedInput,
    pending: PendingOutput,
    ran: bool,
}

impl LzmaStream {
    fn run_backend(&mut self) -> Result<(), CodecFault> {
        let input = self.staged.take();
        let mut reader = io::BufReader::new(input.as_slice());
        let mut output = Vec::new();
        match self.direction {
            Direction::Encode => lzma_rs::lzma_compress(&mut reader, &mut output)
                .map_err(|e| CodecFault::new(format!("lzma encode failed: {e}")))?,
            Direction::Decode => lzma_rs::lzma_decompress(&mut reader, &mut output)
                .map_err(|e| CodecFault::new(format!("lzma decode failed: {e}")))?,
        }
        self.pending.set(output);
        self.ran = true;
        Ok(())
    }
}

impl CodecStream for LzmaStream {
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
