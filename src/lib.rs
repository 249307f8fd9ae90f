//! Streaming gzip compression and decompression between byte endpoints.
//!
//! The crate is built around two kinds of endpoints: a [`PullEndpoint`] produces bytes on demand
//! and a [`PushEndpoint`] accepts them. The drivers sit between the two:
//!
//! * [`read::GzipDecoder`] pulls compressed data from an upstream endpoint and is itself a pull
//!   endpoint of the decompressed data.
//! * [`write::GzipEncoder`] accepts uncompressed data and pushes the compressed stream, one chunk
//!   at a time, to a downstream endpoint. It is itself a push endpoint.
//!
//! Both are also [`std::io::Read`] and [`std::io::Write`] respectively, and any std reader or
//! writer can be turned into an endpoint with [`endpoint::IoReader`] and
//! [`endpoint::IoWriter`].
//!
//! ```
//! use gzstream::{read::GzipDecoder, write::GzipEncoder, MemoryReader, MemoryWriter};
//!
//! # fn main() -> gzstream::Result<()> {
//! let mut encoder = GzipEncoder::new(MemoryWriter::new());
//! encoder.open()?;
//! encoder.write(b"example")?;
//! let compressed = encoder.finish()?.into_inner();
//!
//! let mut decoder = GzipDecoder::new(MemoryReader::new(compressed));
//! decoder.open()?;
//! let mut buf = [0; 16];
//! let len = decoder.read(&mut buf)?;
//! assert_eq!(&buf[..len], b"example");
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! Drivers are single-use: `open` once, any number of reads or writes, `close` once. Calling
//! these out of order is a programming error and panics. Once an operation has failed the driver
//! keeps failing with a [`GzipErrorKind::StreamError`].
//!
//! Dropping a [`write::GzipEncoder`] without closing it leaves the compressed stream without its
//! trailer, which decoders will not accept as complete.

#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod codec;
pub mod endpoint;
mod error;
pub mod read;
mod util;
pub mod write;

pub use crate::{
    codec::Container,
    endpoint::{MemoryReader, MemoryWriter, PullEndpoint, PushEndpoint},
    error::{
        Error, GzipError, GzipErrorKind, Result, Z_BUF_ERROR, Z_DATA_ERROR, Z_MEM_ERROR,
        Z_STREAM_ERROR, Z_VERSION_ERROR,
    },
    util::{hex_string, PartialBuffer},
};

pub use flate2;

/// Level of compression data should be compressed with.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Level {
    /// No compression, the data is stored in deflate's uncompressed blocks.
    Uncompressed,
    /// Fastest quality of compression, usually produces bigger size.
    Fastest,
    /// Best quality of compression, usually produces the smallest size.
    Best,
    /// Default quality of compression.
    #[default]
    Default,
    /// Precise quality, from 0 (none) to 9 (best).
    /// Qualities are implicitly clamped to 9.
    Precise(u32),
}

impl Level {
    pub(crate) fn into_flate2(self) -> flate2::Compression {
        match self {
            Self::Uncompressed => flate2::Compression::none(),
            Self::Fastest => flate2::Compression::fast(),
            Self::Best => flate2::Compression::best(),
            Self::Precise(quality) => flate2::Compression::new(std::cmp::min(quality, 9)),
            Self::Default => flate2::Compression::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Level;

    #[test]
    fn precise_levels_are_clamped() {
        assert_eq!(Level::Precise(42).into_flate2().level(), 9);
        assert_eq!(Level::Precise(3).into_flate2().level(), 3);
        assert_eq!(Level::Uncompressed.into_flate2().level(), 0);
    }
}
