use crate::{
    codec::{Encode, FlateEncoder, Status},
    error::GzipError,
    util::PartialBuffer,
};

use flate2::{Compression, Crc};

#[derive(Debug)]
enum State {
    Header(PartialBuffer<Vec<u8>>),
    Encoding,
    Footer(PartialBuffer<Vec<u8>>),
    Done,
}

/// Gzip member framing around a raw deflate engine.
#[derive(Debug)]
pub struct GzipEncoder {
    inner: FlateEncoder,
    crc: Crc,
    state: State,
}

fn header(level: Compression) -> Vec<u8> {
    let level_byte = if level.level() >= Compression::best().level() {
        0x02
    } else if level.level() <= Compression::fast().level() {
        0x04
    } else {
        0x00
    };

    vec![0x1f, 0x8b, 0x08, 0, 0, 0, 0, 0, level_byte, 0xff]
}

impl GzipEncoder {
    pub fn new(level: Compression) -> Self {
        Self {
            inner: FlateEncoder::new(level, false),
            crc: Crc::new(),
            state: State::Header(header(level).into()),
        }
    }

    fn footer(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(8);

        output.extend(&self.crc.sum().to_le_bytes());
        output.extend(&self.crc.amount().to_le_bytes());

        output
    }
}

impl Encode for GzipEncoder {
    fn encode(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
        output: &mut PartialBuffer<&mut [u8]>,
    ) -> Result<Status, GzipError> {
        loop {
            match &mut self.state {
                State::Header(header) => {
                    output.copy_unwritten_from(header);

                    if header.unwritten().is_empty() {
                        self.state = State::Encoding;
                    }
                }

                State::Encoding => {
                    let prior = input.written().len();
                    let res = self.inner.encode(input, output);
                    self.crc.update(&input.written()[prior..]);
                    res?;
                }

                State::Footer(_) | State::Done => {
                    return Err(GzipError::stream("encode after finish"));
                }
            };

            if input.unwritten().is_empty() || output.unwritten().is_empty() {
                return Ok(Status::Ok);
            }
        }
    }

    fn flush(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<bool, GzipError> {
        loop {
            match &mut self.state {
                State::Header(header) => {
                    output.copy_unwritten_from(header);

                    if header.unwritten().is_empty() {
                        self.state = State::Encoding;
                    } else {
                        return Ok(false);
                    }
                }

                State::Encoding => return self.inner.flush(output),

                State::Footer(_) | State::Done => return Ok(true),
            }
        }
    }

    fn finish(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<Status, GzipError> {
        loop {
            match &mut self.state {
                State::Header(header) => {
                    output.copy_unwritten_from(header);

                    if header.unwritten().is_empty() {
                        self.state = State::Encoding;
                    }
                }

                State::Encoding => {
                    if self.inner.finish(output)? == Status::StreamEnd {
                        self.state = State::Footer(self.footer().into());
                    }
                }

                State::Footer(footer) => {
                    output.copy_unwritten_from(footer);

                    if footer.unwritten().is_empty() {
                        self.state = State::Done;
                    }
                }

                State::Done => return Ok(Status::StreamEnd),
            };

            if let State::Done = self.state {
                return Ok(Status::StreamEnd);
            }

            if output.unwritten().is_empty() {
                return Ok(Status::Ok);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn encode_all(encoder: &mut GzipEncoder, data: &[u8], chunk: usize) -> Vec<u8> {
        let mut compressed = Vec::new();
        let mut buf = vec![0; chunk];

        let mut input = PartialBuffer::new(data);
        while !input.unwritten().is_empty() {
            let mut output = PartialBuffer::new(&mut buf[..]);
            encoder.encode(&mut input, &mut output).unwrap();
            compressed.extend_from_slice(output.written());
        }

        loop {
            let mut output = PartialBuffer::new(&mut buf[..]);
            let status = encoder.finish(&mut output).unwrap();
            compressed.extend_from_slice(output.written());
            if status == Status::StreamEnd {
                break;
            }
        }

        compressed
    }

    #[test]
    fn empty_input_is_twenty_bytes() {
        let compressed = encode_all(&mut GzipEncoder::new(Compression::default()), &[], 64);
        assert_eq!(compressed.len(), 20);
        assert_eq!(compressed[..2], [0x1f, 0x8b]);
    }

    #[test]
    fn header_and_footer_split_over_tiny_outputs() {
        let data = b"split me into many small pieces, many many small pieces";
        let compressed = encode_all(&mut GzipEncoder::new(Compression::best()), data, 3);
        assert_eq!(compressed[8], 0x02);

        let mut output = Vec::new();
        GzDecoder::new(&compressed[..])
            .read_to_end(&mut output)
            .unwrap();
        assert_eq!(output, data);
    }

    #[test]
    fn encode_after_finish_is_a_stream_error() {
        let mut encoder = GzipEncoder::new(Compression::fast());
        encode_all(&mut encoder, b"abc", 64);

        let mut buf = [0; 16];
        let err = encoder
            .encode(
                &mut PartialBuffer::new(&b"more"[..]),
                &mut PartialBuffer::new(&mut buf[..]),
            )
            .unwrap_err();
        assert_eq!(err.kind(), crate::GzipErrorKind::StreamError);
    }
}
