use std::fmt::Write as _;

/// Buffer containing partially written data.
#[derive(Debug, Default)]
pub struct PartialBuffer<B> {
    /// Underlying buffer.
    buffer: B,
    /// Index up to which data has been written (or consumed, for input buffers).
    index: usize,
}

impl<B: AsRef<[u8]>> PartialBuffer<B> {
    /// Create a new [`PartialBuffer`] from the given underlying buffer.
    pub fn new(buffer: B) -> Self {
        Self { buffer, index: 0 }
    }

    /// Written part of the buffer.
    pub fn written(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.index]
    }

    /// Unwritten part of the buffer.
    pub fn unwritten(&self) -> &[u8] {
        &self.buffer.as_ref()[self.index..]
    }

    /// Advance the written part.
    pub fn advance(&mut self, amount: usize) {
        assert!(self.index + amount <= self.buffer.as_ref().len());
        self.index += amount;
    }

    /// Convert the [`PartialBuffer`] back into the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PartialBuffer<B> {
    /// Mutable reference to the unwritten part of the buffer.
    pub fn unwritten_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[self.index..]
    }

    /// Copy the unwritten part of another buffer into this buffer, advancing both buffers.
    pub fn copy_unwritten_from<C: AsRef<[u8]>>(&mut self, other: &mut PartialBuffer<C>) -> usize {
        let len = self.unwritten().len().min(other.unwritten().len());

        self.unwritten_mut()[..len].copy_from_slice(&other.unwritten()[..len]);

        self.advance(len);
        other.advance(len);
        len
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> From<B> for PartialBuffer<B> {
    fn from(buffer: B) -> Self {
        Self::new(buffer)
    }
}

/// Fixed-capacity scratch buffer owned by a driver.
///
/// Holds `pending` bytes starting at `offset`; `offset + pending <= capacity` at all times.
#[derive(Debug)]
pub(crate) struct Chunk {
    buffer: Box<[u8]>,
    offset: usize,
    pending: usize,
}

impl Chunk {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "chunk capacity must be non-zero");

        Self {
            buffer: vec![0; capacity].into_boxed_slice(),
            offset: 0,
            pending: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending == 0
    }

    pub(crate) fn pending(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.pending]
    }

    pub(crate) fn consume(&mut self, amount: usize) {
        assert!(amount <= self.pending);
        self.offset += amount;
        self.pending -= amount;
    }

    pub(crate) fn clear(&mut self) {
        self.offset = 0;
        self.pending = 0;
    }

    /// Discard whatever is pending and let `fill` write into the whole buffer, from its start.
    /// `fill` returns how many bytes it produced.
    pub(crate) fn refill<E>(
        &mut self,
        fill: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<usize, E> {
        self.clear();
        let produced = fill(&mut self.buffer)?;
        assert!(produced <= self.capacity());
        self.pending = produced;
        Ok(produced)
    }
}

/// Renders `bytes` as lowercase hex, each byte followed by a single space.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for byte in bytes {
        let _ = write!(out, "{byte:02x} ");
    }
    out
}
