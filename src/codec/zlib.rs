// Zlib/Deflate codec over flate2's incremental `Compress`/`Decompress`.
//
// Uses the zlib wrapper (RFC 1950), not raw deflate, so the stream carries
// a header that decode-side init can check.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use super::{Codec, CodecFault, CodecId, CodecStream, Direction, Progress, StreamStatus};

/// zlib level used for encoding. Decoding accepts any level.
pub const DEFAULT_LEVEL: u32 = 5;

/// FDICT bit in the FLG byte.
const FLG_PRESET_DICT: u8 = 0x20;

/// Zlib codec (ID 0x205).
#[derive(Debug, Clone, Copy)]
pub struct ZlibCodec {
    level: u32,
}

impl ZlibCodec {
    /// Create a codec encoding at `level` (clamped to 0-9).
    pub const fn new(level: u32) -> Self {
        Self {
            level: if level > 9 { 9 } else { level },
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl Codec for ZlibCodec {
    fn id(&self) -> CodecId {
        CodecId::Zlib
    }

    fn name(&self) -> &'static str {
        "zlib"
    }

    fn init(
        &self,
        direction: Direction,
        source: &[u8],
    ) -> Result<Box<dyn CodecStream>, CodecFault> {
        match direction {
            Direction::Encode => Ok(Box::new(ZlibEncodeStream {
                inner: Compress::new(Compression::new(self.level), true),
            })),
            Direction::Decode => {
                check_header(source)?;
                Ok(Box::new(ZlibDecodeStream {
                    inner: Decompress::new(true),
                }))
            }
        }
    }
}

/// Validate the two-byte zlib header (CMF, FLG).
pub fn check_header(source: &[u8]) -> Result<(), CodecFault> {
    let &[cmf, flg, ..] = source else {
        return Err(CodecFault::new("input too short for a zlib header"));
    };
    if cmf & 0x0F != 8 || cmf >> 4 > 7 {
        return Err(CodecFault::new(format!(
            "not a zlib stream (CMF {cmf:#04x})"
        )));
    }
    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err(CodecFault::new("zlib header check bits mismatch"));
    }
    if flg & FLG_PRESET_DICT != 0 {
        return Err(CodecFault::new("zlib preset dictionaries are not supported"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

struct ZlibEncodeStream {
    inner: Compress,
}

impl CodecStream for ZlibEncodeStream {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Progress, CodecFault> {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let flush = if finalize || src.is_empty() {
            FlushCompress::Finish
        } else {
            FlushCompress::None
        };

        let status = self
            .inner
            .compress(src, dst, flush)
            .map_err(|e| CodecFault::new(format!("deflate failed: {e}")))?;

        Ok(Progress::new(
            (self.inner.total_in() - before_in) as usize,
            (self.inner.total_out() - before_out) as usize,
            stream_status(status),
        ))
    }
}

struct ZlibDecodeStream {
    inner: Decompress,
}

impl CodecStream for ZlibDecodeStream {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        _finalize: bool,
    ) -> Result<Progress, CodecFault> {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();

        let status = self
            .inner
            .decompress(src, dst, FlushDecompress::None)
            .map_err(|e| CodecFault::new(format!("inflate failed: {e}")))?;

        let consumed = (self.inner.total_in() - before_in) as usize;
        if status == Status::StreamEnd && consumed < src.len() {
            return Err(CodecFault::new(format!(
                "{} trailing bytes after the end of the zlib stream",
                src.len() - consumed
            )));
        }

        Ok(Progress::new(
            consumed,
            (self.inner.total_out() - before_out) as usize,
            stream_status(status),
        ))
    }
}

fn stream_status(status: Status) -> StreamStatus {
    match status {
        Status::StreamEnd => StreamStatus::End,
        Status::Ok | Status::BufError => StreamStatus::Ok,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stream: &mut dyn CodecStream, mut src: &[u8], finalize: bool) -> Vec<u8> {
        let mut out = Vec::new();
        let mut dst = [0u8; 64];
        loop {
            let p = stream.process(src, &mut dst, finalize).unwrap();
            src = &src[p.consumed..];
            out.extend_from_slice(&dst[..p.produced]);
            if p.status == StreamStatus::End {
                return out;
            }
            assert!(!p.is_idle(), "stream stalled");
        }
    }

    #[test]
    fn encode_decode_through_small_dst() {
        let data: Vec<u8> = b"Hello, world! This is test data. "
            .iter()
            .copied()
            .cycle()
            .take(1024)
            .collect();
        let codec = ZlibCodec::default();

        let mut enc = codec.init(Direction::Encode, &data).unwrap();
        let compressed = run(enc.as_mut(), &data, true);
        assert!(compressed.len() < data.len());
        assert_eq!(compressed[0], 0x78);

        let mut dec = codec.init(Direction::Decode, &compressed).unwrap();
        assert_eq!(run(dec.as_mut(), &compressed, false), data);
    }

    #[test]
    fn header_validation() {
        assert!(check_header(&[0x78, 0x9C]).is_ok());
        assert!(check_header(&[0x78, 0x01]).is_ok());
        assert!(check_header(&[0x78, 0xDA]).is_ok());
        assert!(check_header(&[0x78]).is_err());
        // Wrong compression method.
        assert!(check_header(&[0x79, 0x9C]).is_err());
        // Check bits off.
        assert!(check_header(&[0x78, 0x9D]).is_err());
        // FDICT set (0x78, 0xBB passes the modulus).
        assert!(check_header(&[0x78, 0xBB]).is_err());
        assert!(check_header(b"plain text").is_err());
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(ZlibCodec::new(42).level(), 9);
        assert_eq!(ZlibCodec::default().level(), DEFAULT_LEVEL);
    }

    #[test]
    fn corrupt_body_reports_fault() {
        let garbage = [0x78, 0x9C, 0xFF, 0xFF, 0xFF, 0xFF];
        let codec = ZlibCodec::default();
        let mut dec = codec.init(Direction::Decode, &garbage).unwrap();
        let mut dst = [0u8; 16];
        assert!(dec.process(&garbage, &mut dst, false).is_err());
    }

    #[test]
    fn trailing_bytes_after_stream_end_fault() {
        let mut stream = vec![
            0x78, 0x01, 0x01, 0x05, 0x00, 0xFA, 0xFF, b'h', b'e', b'l', b'l', b'o', 0x06, 0x2C,
            0x02, 0x15,
        ];
        let codec = ZlibCodec::default();
        let mut dec = codec.init(Direction::Decode, &stream).unwrap();
        assert_eq!(run(dec.as_mut(), &stream, false), b"hello");

        stream.extend_from_slice(b"XY");
        let mut dec = codec.init(Direction::Decode, &stream).unwrap();
        let mut dst = [0u8; 64];
        let err = dec.process(&stream, &mut dst, false).unwrap_err();
        assert!(err.reason().contains("2 trailing bytes"), "{err}");
    }
}
