use super::{PullEndpoint, PushEndpoint};
use std::io::{ErrorKind, Read, Result, Write};

/// Pull endpoint over any [`Read`].
#[derive(Debug)]
pub struct IoReader<R> {
    reader: R,
    exhausted: bool,
}

impl<R: Read> IoReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            exhausted: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> PullEndpoint for IoReader<R> {
    fn has_data_available(&self) -> bool {
        !self.exhausted
    }

    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.reader.read(buf) {
                Ok(0) if !buf.is_empty() => {
                    self.exhausted = true;
                    return Ok(0);
                }
                Ok(len) => return Ok(len),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn close(&mut self) {
        self.exhausted = true;
    }
}

/// Push endpoint over any [`Write`].
#[derive(Debug)]
pub struct IoWriter<W> {
    writer: W,
}

impl<W: Write> IoWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PushEndpoint for IoWriter<W> {
    fn has_space_available(&self) -> bool {
        true
    }

    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_all(buf)
    }

    /// Flushes the underlying writer.
    fn close(&mut self) -> Result<()> {
        self.writer.flush()
    }
}
