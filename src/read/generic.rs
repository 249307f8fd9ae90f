use crate::{
    codec::{Decode, Header, Status},
    endpoint::PullEndpoint,
    error::{Error, GzipError, GzipErrorKind, Result},
    util::{Chunk, PartialBuffer},
};

use tracing::{debug, trace};

#[derive(Debug)]
enum State<D> {
    Unopened(D),
    Streaming(D),
    /// End of input was reached and the engine finalized.
    Finished,
    /// The engine or the endpoint failed, the engine is gone.
    Failed,
    Closed,
}

/// Everything on the compressed side of the output scratch buffer.
#[derive(Debug)]
struct Pump<R, D> {
    reader: R,
    state: State<D>,
    input: Chunk,
    header: Option<Header>,
    /// Upstream error held back until the bytes decoded before it have been handed out.
    deferred: Option<Error>,
}

impl<R: PullEndpoint, D: Decode> Pump<R, D> {
    fn finalize(&mut self) {
        if let State::Streaming(decoder) = std::mem::replace(&mut self.state, State::Finished) {
            self.header = decoder.header().cloned();
            debug!("end of compressed input, engine finalized");
        }
    }

    fn fail(&mut self, err: GzipError) -> GzipError {
        if let State::Streaming(decoder) = std::mem::replace(&mut self.state, State::Failed) {
            self.header = decoder.header().cloned();
        }
        debug!(%err, kind = ?err.kind(), "decompression failed, engine finalized");
        err
    }

    /// Produces up to `buf.len()` decompressed bytes into `buf`, from its start.
    ///
    /// Returns less than a full buffer only at the end of input, or when the engine stalled.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }

        let mut output = PartialBuffer::new(buf);

        loop {
            let State::Streaming(decoder) = &mut self.state else {
                return Ok(output.written().len());
            };

            if self.input.is_empty() {
                let reader = &mut self.reader;
                let len = match self.input.refill(|buf| reader.read(buf)) {
                    Ok(len) => len,
                    Err(err) if !output.written().is_empty() => {
                        self.deferred = Some(err.into());
                        return Ok(output.written().len());
                    }
                    Err(err) => return Err(err.into()),
                };
                trace!(len, "pulled compressed chunk");

                if len == 0 {
                    // Upstream is exhausted: flush what the engine still holds, then finish.
                    let prior = output.written().len();
                    let status = match decoder.decode(&mut PartialBuffer::new(&[][..]), &mut output) {
                        Ok(status) => status,
                        Err(err) => return Err(self.fail(err).into()),
                    };

                    if status != Status::StreamEnd
                        && output.written().len() > prior
                        && output.unwritten().is_empty()
                    {
                        return Ok(output.written().len());
                    }

                    if status == Status::StreamEnd || output.written().len() == prior {
                        self.finalize();
                        return Ok(output.written().len());
                    }

                    continue;
                }
            }

            let prior = output.written().len();
            let mut input = PartialBuffer::new(self.input.pending());
            let res = decoder.decode(&mut input, &mut output);
            let consumed = input.written().len();
            self.input.consume(consumed);

            match res {
                Ok(Status::StreamEnd) => {
                    self.finalize();
                    return Ok(output.written().len());
                }
                Ok(Status::Ok) => {}
                Err(err) => return Err(self.fail(err).into()),
            }

            if output.unwritten().is_empty() {
                return Ok(output.written().len());
            }

            if consumed == 0 && output.written().len() == prior {
                trace!("engine made no progress");
                return Ok(output.written().len());
            }
        }
    }
}

/// Decompression driver: pulls compressed bytes from `R` through the engine `D`.
#[derive(Debug)]
pub struct Decoder<R, D> {
    pump: Pump<R, D>,
    output: Chunk,
}

impl<R: PullEndpoint, D: Decode> Decoder<R, D> {
    pub fn new(reader: R, decoder: D, in_chunk_size: usize, out_chunk_size: usize) -> Self {
        Self {
            pump: Pump {
                reader,
                state: State::Unopened(decoder),
                input: Chunk::with_capacity(in_chunk_size),
                header: None,
                deferred: None,
            },
            output: Chunk::with_capacity(out_chunk_size),
        }
    }

    pub fn open(&mut self) -> Result<()> {
        self.pump.state = match std::mem::replace(&mut self.pump.state, State::Closed) {
            State::Unopened(decoder) => State::Streaming(decoder),
            _ => panic!("a decoder can be opened only once"),
        };

        debug!(
            in_chunk_size = self.pump.input.capacity(),
            out_chunk_size = self.output.capacity(),
            "decoder opened"
        );
        Ok(())
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.pump.state {
            State::Unopened(_) => panic!("read from a decoder that was never opened"),
            State::Closed => panic!("read from a closed decoder"),
            State::Failed => return Err(GzipError::stream("stream has already failed").into()),
            State::Streaming(_) | State::Finished => {}
        }

        let mut out = PartialBuffer::new(buf);

        while !out.unwritten().is_empty() {
            if !self.output.is_empty() {
                let len = out.copy_unwritten_from(&mut PartialBuffer::new(self.output.pending()));
                self.output.consume(len);
                continue;
            }

            let Self { pump, output } = self;
            let produced = match output.refill(|buf| pump.fill(buf)) {
                Ok(produced) => produced,
                // Report the bytes already copied out, the endpoint error comes next call.
                Err(Error::Io(err)) if !out.written().is_empty() => {
                    pump.deferred = Some(Error::Io(err));
                    break;
                }
                Err(err) => return Err(err),
            };

            if produced == 0 {
                match self.pump.state {
                    State::Finished => break,
                    _ => {
                        let err = GzipError::new(
                            GzipErrorKind::BufferError,
                            Some("engine made no progress".to_owned()),
                        );
                        return Err(self.pump.fail(err).into());
                    }
                }
            }
        }

        Ok(out.written().len())
    }

    /// `false` once every decompressed byte has been produced and delivered.
    pub fn has_data_available(&self) -> bool {
        match self.pump.state {
            State::Unopened(_) | State::Streaming(_) => true,
            State::Finished | State::Failed => !self.output.is_empty(),
            State::Closed => false,
        }
    }

    pub fn close(&mut self) {
        match std::mem::replace(&mut self.pump.state, State::Closed) {
            State::Unopened(_) => panic!("tried to close a decoder that was never opened"),
            State::Closed => panic!("tried to close a decoder twice"),
            State::Streaming(_) | State::Finished | State::Failed => {}
        }

        self.pump.input.clear();
        self.pump.deferred = None;
        self.output.clear();
        debug!("decoder closed");
    }

    pub fn header(&self) -> Option<&Header> {
        match &self.pump.state {
            State::Streaming(decoder) => decoder.header(),
            _ => self.pump.header.as_ref(),
        }
    }
}

impl<R, D> Decoder<R, D> {
    pub fn get_ref(&self) -> &R {
        &self.pump.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.pump.reader
    }

    pub fn into_inner(self) -> R {
        self.pump.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::MemoryReader;

    /// Swallows nothing and produces nothing.
    #[derive(Debug)]
    struct Stalled;

    impl Decode for Stalled {
        fn decode(
            &mut self,
            _input: &mut PartialBuffer<&[u8]>,
            _output: &mut PartialBuffer<&mut [u8]>,
        ) -> Result<Status, GzipError> {
            Ok(Status::Ok)
        }
    }

    /// Copies input to output until it has seen `limit` bytes, then reports the end.
    #[derive(Debug)]
    struct Passthrough {
        limit: usize,
        seen: usize,
    }

    impl Decode for Passthrough {
        fn decode(
            &mut self,
            input: &mut PartialBuffer<&[u8]>,
            output: &mut PartialBuffer<&mut [u8]>,
        ) -> Result<Status, GzipError> {
            let mut input_limited = PartialBuffer::new(
                &input.unwritten()[..input.unwritten().len().min(self.limit - self.seen)],
            );
            let len = output.copy_unwritten_from(&mut input_limited);
            input.advance(len);
            self.seen += len;

            if self.seen == self.limit {
                Ok(Status::StreamEnd)
            } else {
                Ok(Status::Ok)
            }
        }
    }

    #[test]
    fn zero_progress_is_a_buffer_error() {
        let mut decoder = Decoder::new(MemoryReader::new(vec![1, 2, 3]), Stalled, 4, 4);
        decoder.open().unwrap();

        let mut buf = [0; 8];
        let err = decoder.read(&mut buf).unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::BufferError));
        assert!(!decoder.has_data_available());

        let err = decoder.read(&mut buf).unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
    }

    #[test]
    fn stream_end_stops_pulling() {
        let data: Vec<u8> = (0..100).collect();
        let mut decoder = Decoder::new(
            MemoryReader::new(data.clone()),
            Passthrough { limit: 30, seen: 0 },
            7,
            5,
        );
        decoder.open().unwrap();

        let mut out = Vec::new();
        let mut buf = [0; 3];
        loop {
            let len = decoder.read(&mut buf).unwrap();
            if len == 0 {
                break;
            }
            out.extend_from_slice(&buf[..len]);
        }

        assert_eq!(out, &data[..30]);
        assert!(!decoder.has_data_available());
        assert_eq!(decoder.read(&mut buf).unwrap(), 0);
        decoder.close();
    }

    #[test]
    #[should_panic(expected = "opened only once")]
    fn open_twice_panics() {
        let mut decoder = Decoder::new(MemoryReader::default(), Stalled, 4, 4);
        decoder.open().unwrap();
        let _ = decoder.open();
    }

    #[test]
    #[should_panic(expected = "never opened")]
    fn read_before_open_panics() {
        let mut decoder = Decoder::new(MemoryReader::default(), Stalled, 4, 4);
        let _ = decoder.read(&mut [0; 4]);
    }

    /// Fails its `fail_at`-th pull, once.
    #[derive(Debug)]
    struct Flaky {
        inner: MemoryReader,
        pulls: usize,
        fail_at: usize,
    }

    impl PullEndpoint for Flaky {
        fn has_data_available(&self) -> bool {
            self.inner.has_data_available()
        }

        fn open(&mut self) -> std::io::Result<()> {
            self.inner.open()
        }

        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.pulls += 1;
            if self.pulls == self.fail_at {
                return Err(std::io::Error::new(std::io::ErrorKind::Interrupted, "try again"));
            }
            self.inner.read(buf)
        }

        fn close(&mut self) {
            self.inner.close()
        }
    }

    #[test]
    fn endpoint_error_keeps_decoded_bytes() {
        let data: Vec<u8> = (0..100).collect();
        let reader = Flaky {
            inner: MemoryReader::new(data.clone()),
            pulls: 0,
            fail_at: 3,
        };
        let mut decoder = Decoder::new(reader, Passthrough { limit: 100, seen: 0 }, 10, 64);
        decoder.open().unwrap();

        let mut buf = [0; 64];
        assert_eq!(decoder.read(&mut buf).unwrap(), 20);
        assert_eq!(&buf[..20], &data[..20]);

        match decoder.read(&mut buf).unwrap_err() {
            Error::Io(err) => assert_eq!(err.kind(), std::io::ErrorKind::Interrupted),
            err => panic!("unexpected error {err:?}"),
        }

        let mut out = data[..20].to_vec();
        loop {
            let len = decoder.read(&mut buf).unwrap();
            if len == 0 {
                break;
            }
            out.extend_from_slice(&buf[..len]);
        }
        assert_eq!(out, data);
    }
}
