use super::header::{self, Header};
use crate::{
    codec::{Decode, FlateDecoder, Status},
    error::GzipError,
    util::PartialBuffer,
};

use flate2::Crc;

#[derive(Debug)]
enum State {
    Header(header::Parser),
    Decoding,
    Footer(PartialBuffer<[u8; 8]>),
    Done,
}

/// Gzip member framing around a raw inflate engine.
#[derive(Debug)]
pub struct GzipDecoder {
    inner: FlateDecoder,
    crc: Crc,
    state: State,
    header: Option<Header>,
    multiple_members: bool,
}

fn check_footer(crc: &Crc, input: &[u8]) -> Result<(), GzipError> {
    let crc_sum = crc.sum().to_le_bytes();
    let bytes_read = crc.amount().to_le_bytes();

    if crc_sum != input[0..4] {
        return Err(GzipError::data("CRC computed does not match"));
    }

    if bytes_read != input[4..8] {
        return Err(GzipError::data("amount of bytes read does not match"));
    }

    Ok(())
}

impl Default for GzipDecoder {
    fn default() -> Self {
        Self {
            inner: FlateDecoder::new(false),
            crc: Crc::new(),
            state: State::Header(header::Parser::default()),
            header: None,
            multiple_members: false,
        }
    }
}

impl GzipDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep decoding when another member follows the end of the current one.
    pub fn multiple_members(&mut self, enabled: bool) {
        self.multiple_members = enabled;
    }

    fn reinit(&mut self) {
        self.inner = FlateDecoder::new(false);
        self.crc = Crc::new();
        self.state = State::Header(header::Parser::default());
    }
}

impl Decode for GzipDecoder {
    fn decode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError> {
        loop {
            match &mut self.state {
                State::Header(parser) => {
                    if let Some(header) = parser.input(input)? {
                        self.header = Some(header);
                        self.state = State::Decoding;
                    }
                }

                State::Decoding => {
                    let prior = output.written().len();

                    let res = self.inner.decode(input, output);

                    // update CRC even if there was an error
                    self.crc.update(&output.written()[prior..]);

                    if res? == Status::StreamEnd {
                        self.state = State::Footer(PartialBuffer::new([0; 8]));
                    }
                }

                State::Footer(footer) => {
                    footer.copy_unwritten_from(input);

                    if footer.unwritten().is_empty() {
                        check_footer(&self.crc, footer.written())?;
                        self.state = State::Done;
                    }
                }

                State::Done => {
                    if !self.multiple_members {
                        return Ok(Status::StreamEnd);
                    }

                    // Another member may still arrive in a later input.
                    if input.unwritten().is_empty() {
                        return Ok(Status::Ok);
                    }

                    self.reinit();
                    continue;
                }
            };

            if let State::Done = self.state {
                continue;
            }

            if input.unwritten().is_empty() || output.unwritten().is_empty() {
                return Ok(Status::Ok);
            }
        }
    }

    fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }
}
