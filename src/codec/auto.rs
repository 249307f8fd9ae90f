use crate::{
    codec::{Container, Decode, FlateDecoder, GzipDecoder, Header, Status},
    error::GzipError,
    util::PartialBuffer,
};

/// Inflate engine for any [`Container`], picked once when the stream starts.
#[derive(Debug)]
pub enum Inflater {
    /// Waiting for the first byte to tell gzip from zlib.
    Detect { multiple_members: bool },
    Gzip(GzipDecoder),
    Flate(FlateDecoder),
}

impl Inflater {
    pub fn new(container: Container, multiple_members: bool) -> Self {
        match container {
            Container::Gzip => Self::gzip(multiple_members),
            Container::Zlib => Self::Flate(FlateDecoder::new(true)),
            Container::Raw => Self::Flate(FlateDecoder::new(false)),
            Container::Auto => Self::Detect { multiple_members },
        }
    }

    fn gzip(multiple_members: bool) -> Self {
        let mut decoder = GzipDecoder::new();
        decoder.multiple_members(multiple_members);
        Self::Gzip(decoder)
    }
}

impl Decode for Inflater {
    fn decode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError> {
        if let Self::Detect { multiple_members } = *self {
            match input.unwritten().first() {
                None => return Ok(Status::Ok),
                Some(0x1f) => {
                    tracing::trace!("detected gzip container");
                    *self = Self::gzip(multiple_members);
                }
                Some(_) => {
                    tracing::trace!("detected zlib container");
                    *self = Self::Flate(FlateDecoder::new(true));
                }
            }
        }

        match self {
            Self::Detect { .. } => Ok(Status::Ok),
            Self::Gzip(decoder) => decoder.decode(input, output),
            Self::Flate(decoder) => decoder.decode(input, output),
        }
    }

    fn header(&self) -> Option<&Header> {
        match self {
            Self::Gzip(decoder) => decoder.header(),
            _ => None,
        }
    }
}
