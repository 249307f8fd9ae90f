use super::Encoder;
use crate::{codec, endpoint::PushEndpoint, error::Result, Level};

use std::io;

/// Options for a [`GzipEncoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderOptions {
    pub level: Level,
    /// Bytes of compressed output buffered before being pushed downstream.
    pub chunk_size: usize,
}

impl EncoderOptions {
    pub const DEFAULT_CHUNK_SIZE: usize = 1 << 16;

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            level: Level::Default,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A gzip encoder, or compressor.
///
/// Compresses whatever is written to it and pushes the result, one chunk at a time, to the
/// endpoint it is bound to. The stream only becomes a valid gzip member once
/// [`close`](Self::close) has run. An instance can be opened only once.
#[derive(Debug)]
pub struct GzipEncoder<W> {
    inner: Encoder<W, codec::GzipEncoder>,
}

impl<W: PushEndpoint> GzipEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncoderOptions::default())
    }

    /// # Panics
    ///
    /// If the chunk size is zero.
    pub fn with_options(writer: W, options: EncoderOptions) -> Self {
        Self {
            inner: Encoder::new(
                writer,
                codec::GzipEncoder::new(options.level.into_flate2()),
                options.chunk_size,
            ),
        }
    }

    /// Prepares the stream for compression.
    ///
    /// # Panics
    ///
    /// If called more than once on the same instance.
    pub fn open(&mut self) -> Result<()> {
        self.inner.open()
    }

    /// Compresses all of `buf`.
    ///
    /// Any error, from the engine or from the downstream endpoint, fails the encoder for good.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write(buf)
    }

    /// Pushes everything written so far downstream, on a deflate block boundary.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    /// Pushes the rest of the compressed stream and the gzip trailer. The downstream endpoint is
    /// left open.
    pub fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    /// Closes the encoder and hands back the downstream endpoint.
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        Ok(self.into_inner())
    }

    pub fn has_space_available(&self) -> bool {
        self.inner.has_space_available()
    }
}

impl<W> GzipEncoder<W> {
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: PushEndpoint> PushEndpoint for GzipEncoder<W> {
    fn has_space_available(&self) -> bool {
        GzipEncoder::has_space_available(self)
    }

    fn open(&mut self) -> io::Result<()> {
        Ok(GzipEncoder::open(self)?)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        Ok(GzipEncoder::write(self, buf)?)
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(GzipEncoder::close(self)?)
    }
}

impl<W: PushEndpoint> io::Write for GzipEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        GzipEncoder::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(GzipEncoder::flush(self)?)
    }
}
