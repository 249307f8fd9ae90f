use super::buf_error;
use crate::{
    codec::{Decode, Status},
    error::{GzipError, Z_DATA_ERROR},
    util::PartialBuffer,
};

use flate2::{Decompress, FlushDecompress};

/// Inflate engine over `flate2`, either bare deflate or zlib-wrapped.
#[derive(Debug)]
pub struct FlateDecoder {
    decompress: Decompress,
}

impl FlateDecoder {
    pub fn new(zlib_header: bool) -> Self {
        Self {
            decompress: Decompress::new(zlib_header),
        }
    }

    fn do_decode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<(flate2::Status, usize, usize), GzipError> {
        let prior_in = self.decompress.total_in();
        let prior_out = self.decompress.total_out();

        let status = self
            .decompress
            .decompress(input.unwritten(), output.unwritten_mut(), FlushDecompress::None)
            .map_err(|err| GzipError::from_code(Z_DATA_ERROR, Some(err.to_string())))?;

        let in_length = (self.decompress.total_in() - prior_in) as usize;
        let out_length = (self.decompress.total_out() - prior_out) as usize;

        input.advance(in_length);
        output.advance(out_length);

        Ok((status, in_length, out_length))
    }
}

impl Decode for FlateDecoder {
    fn decode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError> {
        if output.unwritten().is_empty() {
            return Ok(Status::Ok);
        }

        let drain = input.unwritten().is_empty();
        let (status, in_length, out_length) = self.do_decode(input, output)?;

        match status {
            flate2::Status::Ok => Ok(Status::Ok),
            flate2::Status::StreamEnd => Ok(Status::StreamEnd),
            // Draining with no input left and nothing buffered is expected to make no progress.
            flate2::Status::BufError if drain => Ok(Status::Ok),
            flate2::Status::BufError => buf_error(in_length, out_length).map(|()| Status::Ok),
        }
    }
}
