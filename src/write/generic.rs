use crate::{
    codec::{Encode, Status},
    endpoint::PushEndpoint,
    error::{Error, GzipError, GzipErrorKind, Result},
    util::{Chunk, PartialBuffer},
};

use tracing::{debug, trace, warn};

#[derive(Debug)]
enum State<E> {
    Unopened(E),
    Streaming(E),
    /// The engine or the endpoint failed, the engine is gone.
    Failed,
    Closed,
}

/// Warns when dropped while still armed: the compressed stream never got its trailer.
#[derive(Debug, Default)]
struct Unfinished(bool);

impl Drop for Unfinished {
    fn drop(&mut self) {
        if self.0 {
            warn!("encoder dropped before close, compressed output is truncated");
        }
    }
}

fn no_progress() -> GzipError {
    GzipError::new(
        GzipErrorKind::BufferError,
        Some("engine made no progress".to_owned()),
    )
}

/// Compression driver: pushes what the engine `E` produces to `W`, one chunk at a time.
#[derive(Debug)]
pub struct Encoder<W, E> {
    writer: W,
    state: State<E>,
    chunk: Chunk,
    unfinished: Unfinished,
}

impl<W: PushEndpoint, E: Encode> Encoder<W, E> {
    pub fn new(writer: W, encoder: E, chunk_size: usize) -> Self {
        Self {
            writer,
            state: State::Unopened(encoder),
            chunk: Chunk::with_capacity(chunk_size),
            unfinished: Unfinished::default(),
        }
    }

    pub fn open(&mut self) -> Result<()> {
        self.state = match std::mem::replace(&mut self.state, State::Closed) {
            State::Unopened(encoder) => State::Streaming(encoder),
            _ => panic!("an encoder can be opened only once"),
        };
        self.unfinished.0 = true;

        debug!(chunk_size = self.chunk.capacity(), "encoder opened");
        Ok(())
    }

    fn check_streaming(&self, op: &str) -> Result<()> {
        match self.state {
            State::Streaming(_) => Ok(()),
            State::Failed => Err(GzipError::stream("stream has already failed").into()),
            State::Unopened(_) => panic!("{op} on an encoder that was never opened"),
            State::Closed => panic!("{op} on a closed encoder"),
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.state = State::Failed;
        self.unfinished.0 = false;
        debug!(%err, "compression failed, engine finalized");
        err
    }

    /// Runs one engine call against the whole scratch chunk and pushes whatever it produced.
    ///
    /// Returns the engine's result and the number of bytes pushed.
    fn step<T>(
        &mut self,
        op: impl FnOnce(&mut E, &mut PartialBuffer<&mut [u8]>) -> Result<T, GzipError>,
    ) -> Result<(T, usize)> {
        let State::Streaming(encoder) = &mut self.state else {
            return Err(GzipError::stream("stream is not open").into());
        };

        let mut value = None;
        let res = self.chunk.refill(|buf| {
            let mut output = PartialBuffer::new(buf);
            value = Some(op(encoder, &mut output)?);
            Ok::<_, GzipError>(output.written().len())
        });

        let (produced, value) = match (res, value) {
            (Ok(produced), Some(value)) => (produced, value),
            (Err(err), _) => return Err(self.fail(err.into())),
            (Ok(_), None) => unreachable!("engine call returned without a value"),
        };

        if produced > 0 {
            if let Err(err) = self.writer.write(self.chunk.pending()) {
                return Err(self.fail(err.into()));
            }
            trace!(len = produced, "pushed compressed chunk");
        }
        self.chunk.clear();

        Ok((value, produced))
    }

    /// Compresses all of `buf`, pushing every chunk the engine fills along the way.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.check_streaming("write")?;

        let mut input = PartialBuffer::new(buf);
        while !input.unwritten().is_empty() {
            loop {
                let prior = input.written().len();
                let (_, produced) = self.step(|encoder, output| encoder.encode(&mut input, output))?;

                if produced == self.chunk.capacity() {
                    continue;
                }

                if produced == 0 && input.written().len() == prior {
                    return Err(self.fail(no_progress().into()));
                }

                break;
            }
        }

        Ok(())
    }

    /// Pushes everything written so far, so that it can be decompressed without waiting for
    /// `close`.
    pub fn flush(&mut self) -> Result<()> {
        self.check_streaming("flush")?;

        loop {
            let (flushed, _) = self.step(|encoder, output| encoder.flush(output))?;
            if flushed {
                return Ok(());
            }
        }
    }

    /// Finishes the stream, pushing the remaining output and the trailer, and releases the
    /// engine.
    pub fn close(&mut self) -> Result<()> {
        if let State::Failed = self.state {
            self.state = State::Closed;
            return Err(GzipError::stream("stream has already failed").into());
        }
        self.check_streaming("close")?;

        loop {
            let (status, produced) = self.step(|encoder, output| encoder.finish(output))?;

            if status == Status::StreamEnd {
                break;
            }

            if produced == 0 {
                return Err(self.fail(no_progress().into()));
            }
        }

        self.state = State::Closed;
        self.unfinished.0 = false;
        debug!("encoder closed, stream complete");
        Ok(())
    }

    pub fn has_space_available(&self) -> bool {
        self.writer.has_space_available()
    }
}

impl<W, E> Encoder<W, E> {
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{endpoint::MemoryWriter, error::Z_DATA_ERROR};
    use std::io;

    /// Copies input through and appends `trailer` on finish.
    #[derive(Debug)]
    struct Passthrough {
        trailer: PartialBuffer<Vec<u8>>,
    }

    impl Passthrough {
        fn new(trailer: &[u8]) -> Self {
            Self {
                trailer: PartialBuffer::new(trailer.to_vec()),
            }
        }
    }

    impl Encode for Passthrough {
        fn encode(
            &mut self,
            input: &mut PartialBuffer<&[u8]>,
            output: &mut PartialBuffer<&mut [u8]>,
        ) -> Result<Status, GzipError> {
            output.copy_unwritten_from(input);
            Ok(Status::Ok)
        }

        fn flush(&mut self, _output: &mut PartialBuffer<&mut [u8]>) -> Result<bool, GzipError> {
            Ok(true)
        }

        fn finish(&mut self, output: &mut PartialBuffer<&mut [u8]>) -> Result<Status, GzipError> {
            output.copy_unwritten_from(&mut self.trailer);
            if self.trailer.unwritten().is_empty() {
                Ok(Status::StreamEnd)
            } else {
                Ok(Status::Ok)
            }
        }
    }

    /// How `Broken` misbehaves.
    #[derive(Debug, Clone, Copy)]
    enum Fault {
        /// `encode` fails with a data error.
        Rejects,
        /// `encode` consumes and produces nothing.
        StallsOnEncode,
        /// `finish` never reports the end and produces nothing.
        StallsOnFinish,
    }

    #[derive(Debug)]
    struct Broken(Fault);

    impl Encode for Broken {
        fn encode(
            &mut self,
            input: &mut PartialBuffer<&[u8]>,
            output: &mut PartialBuffer<&mut [u8]>,
        ) -> Result<Status, GzipError> {
            match self.0 {
                Fault::Rejects => Err(GzipError::from_code(
                    Z_DATA_ERROR,
                    Some("bad input".to_owned()),
                )),
                Fault::StallsOnEncode => Ok(Status::Ok),
                Fault::StallsOnFinish => {
                    output.copy_unwritten_from(input);
                    Ok(Status::Ok)
                }
            }
        }

        fn flush(&mut self, _output: &mut PartialBuffer<&mut [u8]>) -> Result<bool, GzipError> {
            Ok(true)
        }

        fn finish(&mut self, _output: &mut PartialBuffer<&mut [u8]>) -> Result<Status, GzipError> {
            Ok(Status::Ok)
        }
    }

    /// Rejects every write.
    #[derive(Debug)]
    struct Full;

    impl PushEndpoint for Full {
        fn has_space_available(&self) -> bool {
            false
        }

        fn open(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn write(&mut self, _buf: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "no space left"))
        }

        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn chunks_are_pushed_eagerly() {
        let mut encoder = Encoder::new(MemoryWriter::new(), Passthrough::new(b"END"), 4);
        encoder.open().unwrap();

        encoder.write(b"0123456789").unwrap();
        assert_eq!(encoder.get_ref().data(), b"0123456789");

        encoder.close().unwrap();
        assert_eq!(encoder.into_inner().into_inner(), b"0123456789END");
    }

    #[test]
    fn endpoint_errors_pass_through() {
        let mut encoder = Encoder::new(Full, Passthrough::new(b""), 4);
        encoder.open().unwrap();
        assert!(!encoder.has_space_available());

        match encoder.write(b"data").unwrap_err() {
            Error::Io(err) => assert_eq!(err.kind(), io::ErrorKind::WriteZero),
            err => panic!("unexpected error {err:?}"),
        }

        let err = encoder.write(b"data").unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
        assert!(encoder.close().is_err());
    }

    #[test]
    #[should_panic(expected = "opened only once")]
    fn open_twice_panics() {
        let mut encoder = Encoder::new(MemoryWriter::new(), Passthrough::new(b""), 4);
        encoder.open().unwrap();
        let _ = encoder.open();
    }

    #[test]
    #[should_panic(expected = "closed encoder")]
    fn write_after_close_panics() {
        let mut encoder = Encoder::new(MemoryWriter::new(), Passthrough::new(b""), 4);
        encoder.open().unwrap();
        encoder.close().unwrap();
        let _ = encoder.write(b"late");
    }

    #[test]
    fn engine_error_fails_the_encoder() {
        let mut encoder = Encoder::new(MemoryWriter::new(), Broken(Fault::Rejects), 4);
        encoder.open().unwrap();

        let err = encoder.write(b"data").unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::DataError));
        assert_eq!(err.to_string(), "bad input");

        let err = encoder.write(b"data").unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
        let err = encoder.flush().unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
        let err = encoder.close().unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
        assert!(encoder.get_ref().data().is_empty());
    }

    #[test]
    fn stalled_encode_is_a_buffer_error() {
        let mut encoder = Encoder::new(MemoryWriter::new(), Broken(Fault::StallsOnEncode), 4);
        encoder.open().unwrap();

        let err = encoder.write(b"data").unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::BufferError));

        let err = encoder.write(b"data").unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
    }

    #[test]
    fn stalled_finish_is_a_buffer_error() {
        let mut encoder = Encoder::new(MemoryWriter::new(), Broken(Fault::StallsOnFinish), 4);
        encoder.open().unwrap();
        encoder.write(b"data").unwrap();
        assert_eq!(encoder.get_ref().data(), b"data");

        let err = encoder.close().unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::BufferError));

        let err = encoder.close().unwrap_err();
        assert_eq!(err.gzip_kind(), Some(GzipErrorKind::StreamError));
    }
}
