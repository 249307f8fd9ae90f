use super::{PullEndpoint, PushEndpoint};
use std::io::Result;

/// Pull endpoint reading from an in-memory buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryReader {
    data: Vec<u8>,
    position: usize,
}

impl MemoryReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }

    /// Bytes not read yet.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.position..]
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl PullEndpoint for MemoryReader {
    fn has_data_available(&self) -> bool {
        self.position < self.data.len()
    }

    /// Rewinds to the start of the buffer.
    fn open(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = self.remaining();
        let len = remaining.len().min(buf.len());

        buf[..len].copy_from_slice(&remaining[..len]);
        self.position += len;

        Ok(len)
    }

    fn close(&mut self) {
        self.position = self.data.len();
    }
}

/// Push endpoint collecting everything written into memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryWriter {
    data: Vec<u8>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl PushEndpoint for MemoryWriter {
    fn has_space_available(&self) -> bool {
        true
    }

    /// Discards anything written before.
    fn open(&mut self) -> Result<()> {
        self.data = Vec::new();
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.data.extend_from_slice(buf);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
