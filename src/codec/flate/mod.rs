mod decoder;
mod encoder;

pub use self::{decoder::FlateDecoder, encoder::FlateEncoder};

use crate::error::{GzipError, Z_BUF_ERROR};

/// `flate2` reports `BufError` whenever a call made no progress at all; with progress it just
/// means an input or output buffer ran dry.
fn buf_error(in_length: usize, out_length: usize) -> Result<(), GzipError> {
    if in_length == 0 && out_length == 0 {
        Err(GzipError::from_code(
            Z_BUF_ERROR,
            Some("engine made no progress".to_owned()),
        ))
    } else {
        Ok(())
    }
}
