//! Decompression: types which pull compressed bytes from a [`PullEndpoint`](crate::PullEndpoint)
//! and hand out the decompressed bytes.

mod generic;
mod gzip;

pub use self::{
    generic::Decoder,
    gzip::{DecoderOptions, GzipDecoder},
};
