// Input staging and output draining for backends without an incremental API.
//
// Some backends only expose "whole buffer in, whole buffer out" calls. To
// serve them through `CodecStream::process`, the stream stages the source
// until end of input is known, runs the backend once, and then drains the
// result into successive destination slices.

/// Source bytes collected until the stream is sealed.
#[derive(Debug, Default)]
pub(crate) struct StagedInput {
    buf: Vec<u8>,
    sealed: bool,
}

impl StagedInput {
    /// Take all of `src`. Seals on `finalize` or on an empty `src`.
    ///
    /// Returns the number of bytes consumed.
    pub(crate) fn absorb(&mut self, src: &[u8], finalize: bool) -> usize {
        if self.sealed {
            return 0;
        }
        self.buf.extend_from_slice(src);
        if finalize || src.is_empty() {
            self.sealed = true;
        }
        src.len()
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Hand over the staged bytes. Only meaningful once sealed.
    pub(crate) fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

/// Backend output waiting to be copied into destination slices.
#[derive(Debug, Default)]
pub(crate) struct PendingOutput {
    buf: Vec<u8>,
    pos: usize,
}

impl PendingOutput {
    pub(crate) fn push(&mut self, bytes: &[u8]) {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Replace the pending bytes wholesale (avoids a copy for one-shot output).
    pub(crate) fn set(&mut self, bytes: Vec<u8>) {
        self.buf = bytes;
        self.pos = 0;
    }

    /// Copy as much as fits into `dst`; returns bytes written.
    pub(crate) fn drain_into(&mut self, dst: &mut [u8]) -> usize {
        let available = &self.buf[self.pos..];
        let n = available.len().min(dst.len());
        dst[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        n
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
