use super::Decoder;
use crate::{
    codec::{Container, Header, Inflater},
    endpoint::PullEndpoint,
    error::Result,
};

use std::io;

/// Options for a [`GzipDecoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderOptions {
    pub container: Container,
    /// Bytes pulled from the upstream endpoint at a time.
    pub in_chunk_size: usize,
    /// Bytes of decompressed output buffered at a time.
    pub out_chunk_size: usize,
    /// Decode concatenated gzip members as one stream.
    pub multiple_members: bool,
}

impl DecoderOptions {
    pub const DEFAULT_IN_CHUNK_SIZE: usize = 1 << 14;
    pub const DEFAULT_OUT_CHUNK_SIZE: usize = 1 << 16;

    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn in_chunk_size(mut self, size: usize) -> Self {
        self.in_chunk_size = size;
        self
    }

    pub fn out_chunk_size(mut self, size: usize) -> Self {
        self.out_chunk_size = size;
        self
    }

    pub fn multiple_members(mut self, enabled: bool) -> Self {
        self.multiple_members = enabled;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            container: Container::default(),
            in_chunk_size: Self::DEFAULT_IN_CHUNK_SIZE,
            out_chunk_size: Self::DEFAULT_OUT_CHUNK_SIZE,
            multiple_members: false,
        }
    }
}

/// A gzip decoder, or decompressor.
///
/// Pulls compressed data from the endpoint it is bound to and is itself a [`PullEndpoint`] of
/// the decompressed data. An instance can be opened only once.
///
/// A stream that ends early, before the gzip trailer, is not reported as an error: whatever was
/// decompressed up to that point is delivered and then the stream ends.
#[derive(Debug)]
pub struct GzipDecoder<R> {
    inner: Decoder<R, Inflater>,
}

impl<R: PullEndpoint> GzipDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// # Panics
    ///
    /// If either chunk size is zero.
    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        let engine = Inflater::new(options.container, options.multiple_members);

        Self {
            inner: Decoder::new(
                reader,
                engine,
                options.in_chunk_size,
                options.out_chunk_size,
            ),
        }
    }

    /// Prepares the stream for decompression.
    ///
    /// # Panics
    ///
    /// If called more than once on the same instance.
    pub fn open(&mut self) -> Result<()> {
        self.inner.open()
    }

    /// Reads up to `buf.len()` decompressed bytes into `buf`.
    ///
    /// Returns less than `buf.len()` only at the end of the stream, `Ok(0)` once everything has
    /// been delivered.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }

    pub fn has_data_available(&self) -> bool {
        self.inner.has_data_available()
    }

    /// Releases the engine. The upstream endpoint is left as is.
    pub fn close(&mut self) {
        self.inner.close()
    }

    /// Header of the (last) gzip member, once it has been parsed.
    pub fn header(&self) -> Option<&Header> {
        self.inner.header()
    }
}

impl<R> GzipDecoder<R> {
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: PullEndpoint> PullEndpoint for GzipDecoder<R> {
    fn has_data_available(&self) -> bool {
        GzipDecoder::has_data_available(self)
    }

    fn open(&mut self) -> io::Result<()> {
        Ok(GzipDecoder::open(self)?)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(GzipDecoder::read(self, buf)?)
    }

    fn close(&mut self) {
        GzipDecoder::close(self)
    }
}

impl<R: PullEndpoint> io::Read for GzipDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(GzipDecoder::read(self, buf)?)
    }
}
