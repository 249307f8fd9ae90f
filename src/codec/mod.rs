//! Codec engines: stateful "feed input, drain output, report status" objects driven by the
//! [`read`](crate::read) and [`write`](crate::write) drivers.
//!
//! Engine failures are classified into a [`GzipError`] here, at the boundary. The drivers only
//! ever see a [`Status`] or an already-classified error.

use crate::{error::GzipError, util::PartialBuffer};

mod auto;
mod flate;
mod gzip;

pub use self::{
    auto::Inflater,
    flate::{FlateDecoder, FlateEncoder},
    gzip::{GzipDecoder, GzipEncoder, Header},
};

/// Non-error outcome of an engine call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Progress was made (possibly none, if an input or output buffer was empty).
    Ok,
    /// The logical end of the stream has been reached; nothing more will be produced.
    StreamEnd,
}

/// Abstraction for decompression engines.
pub trait Decode {
    /// Decode a prefix of `input` into `output`, advancing both.
    ///
    /// Returns [`Status::StreamEnd`] iff the end of the compressed stream has been reached.
    fn decode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError>;

    /// Header of the gzip member being decoded, for engines that parse one.
    fn header(&self) -> Option<&Header> {
        None
    }
}

/// Abstraction for compression engines.
pub trait Encode {
    /// Encode a prefix of `input` into `output`, advancing both.
    fn encode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError>;

    /// Flush the internal buffers into the provided output buffer.
    ///
    /// Returns `true` iff the internal buffers have been completely flushed.
    fn flush(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<bool, GzipError>;

    /// Finish the stream into the provided output buffer, trailer included.
    ///
    /// Returns [`Status::StreamEnd`] once everything has been produced.
    fn finish(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<Status, GzipError>;
}

/// Container format expected around the deflate data when decompressing.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Container {
    /// RFC 1952 gzip header and trailer.
    #[default]
    Gzip,
    /// RFC 1950 zlib header and adler-32 trailer.
    Zlib,
    /// Bare deflate data.
    Raw,
    /// Gzip if the data starts with the gzip magic byte, zlib otherwise.
    Auto,
}
