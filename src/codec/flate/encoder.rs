use super::buf_error;
use crate::{
    codec::{Encode, Status},
    error::{GzipError, Z_STREAM_ERROR},
    util::PartialBuffer,
};

use flate2::{Compress, Compression, FlushCompress};

/// Deflate engine over `flate2`, either bare deflate or zlib-wrapped.
#[derive(Debug)]
pub struct FlateEncoder {
    compress: Compress,
    flushed: bool,
}

impl FlateEncoder {
    pub fn new(level: Compression, zlib_header: bool) -> Self {
        Self {
            compress: Compress::new(level, zlib_header),
            flushed: true,
        }
    }

    fn do_encode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
        flush: FlushCompress,
    ) -> Result<(flate2::Status, usize, usize), GzipError> {
        let prior_in = self.compress.total_in();
        let prior_out = self.compress.total_out();

        let status = self
            .compress
            .compress(input.unwritten(), output.unwritten_mut(), flush)
            .map_err(|err| GzipError::from_code(Z_STREAM_ERROR, Some(err.to_string())))?;

        let in_length = (self.compress.total_in() - prior_in) as usize;
        let out_length = (self.compress.total_out() - prior_out) as usize;

        input.advance(in_length);
        output.advance(out_length);

        Ok((status, in_length, out_length))
    }
}

impl Encode for FlateEncoder {
    fn encode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError> {
        if input.unwritten().is_empty() || output.unwritten().is_empty() {
            return Ok(Status::Ok);
        }

        let (status, in_length, out_length) = self.do_encode(input, output, FlushCompress::None)?;
        if in_length > 0 {
            self.flushed = false;
        }

        match status {
            flate2::Status::Ok => Ok(Status::Ok),
            flate2::Status::StreamEnd => Ok(Status::StreamEnd),
            flate2::Status::BufError => buf_error(in_length, out_length).map(|()| Status::Ok),
        }
    }

    fn flush(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<bool, GzipError> {
        if output.unwritten().is_empty() {
            return Ok(false);
        }

        // One sync marker per flush, however many calls it takes to drain it, otherwise tiny
        // outputs would keep receiving new markers and never finish flushing.
        if !self.flushed {
            self.do_encode(&mut PartialBuffer::new(&[][..]), output, FlushCompress::Sync)?;
            self.flushed = true;
        }

        loop {
            let old_len = output.written().len();
            self.do_encode(&mut PartialBuffer::new(&[][..]), output, FlushCompress::None)?;
            if output.written().len() == old_len {
                break;
            }
        }

        Ok(!output.unwritten().is_empty())
    }

    fn finish(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<Status, GzipError> {
        if output.unwritten().is_empty() {
            return Ok(Status::Ok);
        }

        let (status, in_length, out_length) =
            self.do_encode(&mut PartialBuffer::new(&[][..]), output, FlushCompress::Finish)?;

        match status {
            flate2::Status::Ok => Ok(Status::Ok),
            flate2::Status::StreamEnd => Ok(Status::StreamEnd),
            flate2::Status::BufError => buf_error(in_length, out_length).map(|()| Status::Ok),
        }
    }
}
