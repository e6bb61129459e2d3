// Output accumulator: append-only collection of flushed scratch chunks.

/// Growable byte sequence that collects output chunks for one transform.
///
/// Consumed by [`finish`](OutputAccumulator::finish), so it cannot be reused
/// after the result has been handed out.
#[derive(Debug, Default)]
pub struct OutputAccumulator {
    buf: Vec<u8>,
    chunks: usize,
}

impl OutputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            chunks: 0,
        }
    }

    /// Copy `chunk` onto the end. Growth is amortized by `Vec`.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
        self.chunks += 1;
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of `append` calls so far.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
