//! Compression side: drivers that accept uncompressed bytes and push compressed bytes to a
//! [`PushEndpoint`](crate::PushEndpoint).

mod generic;
mod gzip;

pub use self::{
    generic::Encoder,
    gzip::{EncoderOptions, GzipEncoder},
};
