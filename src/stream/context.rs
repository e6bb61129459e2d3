// Per-call stream state: the open codec stream plus its cursor pair.
//
// The source cursor is a shrinking view over the caller's input (no copy).
// The destination cursor is a write position inside the scratch buffer;
// `rewind` resets it after the driver flushes the buffer.

use crate::codec::{CodecFault, CodecStream, Progress, StreamStatus};

/// Fixed-size output region reused across all process calls of one transform.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: Box<[u8]>,
}

impl ScratchBuffer {
    pub fn new(size: usize) -> Self {
        Self {
            buf: vec![0u8; size].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

/// An open codec stream bound to a source view and a scratch buffer.
///
/// Dropping the context drops the codec stream, which releases it.
pub struct StreamContext<'a> {
    stream: Box<dyn CodecStream>,
    src: &'a [u8],
    scratch: &'a mut ScratchBuffer,
    dst_pos: usize,
    calls: u64,
}

impl<'a> StreamContext<'a> {
    pub fn new(
        stream: Box<dyn CodecStream>,
        src: &'a [u8],
        scratch: &'a mut ScratchBuffer,
    ) -> Self {
        Self {
            stream,
            src,
            scratch,
            dst_pos: 0,
            calls: 0,
        }
    }

    /// Run one codec step and advance both cursors.
    ///
    /// An OK step that moved no bytes means the codec is waiting for input
    /// that will never arrive; that is reported as a fault.
    pub fn process(&mut self, finalize: bool) -> Result<StreamStatus, CodecFault> {
        self.calls += 1;
        let dst = &mut self.scratch.buf[self.dst_pos..];
        let progress = self.stream.process(self.src, dst, finalize)?;
        let Progress {
            consumed,
            produced,
            status,
        } = progress;

        if consumed > self.src.len() || produced > dst.len() {
            return Err(CodecFault::new(format!(
                "codec reported {consumed} consumed / {produced} produced, \
                 beyond {} / {} available",
                self.src.len(),
                dst.len()
            )));
        }

        self.src = &self.src[consumed..];
        self.dst_pos += produced;

        if status == StreamStatus::Ok && progress.is_idle() {
            return Err(CodecFault::new(
                "stream stalled: input ended before the end of the compressed stream",
            ));
        }
        Ok(status)
    }

    /// Bytes of the scratch buffer still free for output.
    pub fn dst_remaining(&self) -> usize {
        self.scratch.capacity() - self.dst_pos
    }

    /// Bytes of input not yet consumed.
    pub fn src_remaining(&self) -> usize {
        self.src.len()
    }

    /// Output written since the last rewind.
    pub fn written(&self) -> &[u8] {
        &self.scratch.buf[..self.dst_pos]
    }

    /// Point the destination cursor back at the start of the scratch buffer.
    pub fn rewind(&mut self) {
        self.dst_pos = 0;
    }

    /// Number of `process` calls made so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Copies input straight through, at most `step` bytes per call.
    struct Passthrough {
        step: usize,
    }

    impl CodecStream for Passthrough {
        fn process(
            &mut self,
            src: &[u8],
            dst: &mut [u8],
            _finalize: bool,
        ) -> Result<Progress, CodecFault> {
            let n = src.len().min(dst.len()).min(self.step);
            dst[..n].copy_from_slice(&src[..n]);
            let status = if n == src.len() {
                StreamStatus::End
            } else {
                StreamStatus::Ok
            };
            Ok(Progress::new(n, n, status))
        }
    }

    struct Idle;

    impl CodecStream for Idle {
        fn process(&mut self, _: &[u8], _: &mut [u8], _: bool) -> Result<Progress, CodecFault> {
            Ok(Progress::new(0, 0, StreamStatus::Ok))
        }
    }

    struct Overreport;

    impl CodecStream for Overreport {
        fn process(&mut self, src: &[u8], _: &mut [u8], _: bool) -> Result<Progress, CodecFault> {
            Ok(Progress::new(src.len() + 1, 0, StreamStatus::Ok))
        }
    }

    #[test]
    fn cursors_advance_and_rewind() {
        let input = b"0123456789";
        let mut scratch = ScratchBuffer::new(4);
        let mut ctx = StreamContext::new(Box::new(Passthrough { step: 3 }), input, &mut scratch);

        assert_eq!(ctx.process(true).unwrap(), StreamStatus::Ok);
        assert_eq!(ctx.written(), b"012");
        assert_eq!(ctx.dst_remaining(), 1);
        assert_eq!(ctx.src_remaining(), 7);

        assert_eq!(ctx.process(true).unwrap(), StreamStatus::Ok);
        assert_eq!(ctx.written(), b"0123");
        assert_eq!(ctx.dst_remaining(), 0);

        ctx.rewind();
        assert_eq!(ctx.dst_remaining(), 4);
        assert!(ctx.written().is_empty());
        assert_eq!(ctx.calls(), 2);
    }

    #[test]
    fn idle_step_is_a_fault() {
        let mut scratch = ScratchBuffer::new(8);
        let mut ctx = StreamContext::new(Box::new(Idle), b"abc", &mut scratch);
        let err = ctx.process(false).unwrap_err();
        assert!(err.reason().contains("stalled"));
    }

    #[test]
    fn overreported_progress_is_a_fault() {
        let mut scratch = ScratchBuffer::new(8);
        let mut ctx = StreamContext::new(Box::new(Overreport), b"abc", &mut scratch);
        assert!(ctx.process(false).is_err());
        assert_eq!(ctx.src_remaining(), 3);
    }
}
