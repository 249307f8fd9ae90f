use crate::{error::GzipError, util::PartialBuffer};

const FHCRC: u8 = 0b0000_0010;
const FEXTRA: u8 = 0b0000_0100;
const FNAME: u8 = 0b0000_1000;
const FCOMMENT: u8 = 0b0001_0000;
const RESERVED: u8 = 0b1110_0000;

/// Fields of a parsed gzip member header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    mtime: u32,
    os: u8,
    extra: Option<Vec<u8>>,
    filename: Option<Vec<u8>>,
    comment: Option<Vec<u8>>,
}

impl Header {
    /// Modification time in seconds since the Unix epoch, 0 if unset.
    pub fn mtime(&self) -> u32 {
        self.mtime
    }

    /// Operating system byte, 255 for unknown.
    pub fn os(&self) -> u8 {
        self.os
    }

    pub fn extra(&self) -> Option<&[u8]> {
        self.extra.as_deref()
    }

    /// Original file name, without its NUL terminator.
    pub fn filename(&self) -> Option<&[u8]> {
        self.filename.as_deref()
    }

    pub fn comment(&self) -> Option<&[u8]> {
        self.comment.as_deref()
    }
}

#[derive(Debug)]
enum State {
    Fixed(PartialBuffer<[u8; 10]>),
    ExtraLen(PartialBuffer<[u8; 2]>),
    Extra(PartialBuffer<Vec<u8>>),
    Filename(Vec<u8>),
    Comment(Vec<u8>),
    Crc(PartialBuffer<[u8; 2]>),
    Done,
}

/// Incremental gzip header parser, the header may arrive split over any number of inputs.
#[derive(Debug)]
pub(super) struct Parser {
    state: State,
    /// Optional sections announced by the flags byte and not yet parsed.
    pending: u8,
    header: Header,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            state: State::Fixed(PartialBuffer::new([0; 10])),
            pending: 0,
            header: Header::default(),
        }
    }
}

/// Appends `input` up to a NUL byte into `out`, returns whether the terminator was found.
fn read_to_nul(input: &mut PartialBuffer<&[u8]>, out: &mut Vec<u8>) -> bool {
    match memchr::memchr(0, input.unwritten()) {
        Some(len) => {
            out.extend_from_slice(&input.unwritten()[..len]);
            input.advance(len + 1);
            true
        }
        None => {
            let len = input.unwritten().len();
            out.extend_from_slice(input.unwritten());
            input.advance(len);
            false
        }
    }
}

/// Rejects input as soon as the bytes seen so far can't start a gzip header.
fn check_prefix(prefix: &[u8]) -> Result<(), GzipError> {
    let magic = &prefix[..prefix.len().min(2)];
    if magic != &[0x1f, 0x8b][..magic.len()] {
        return Err(GzipError::data("invalid gzip header"));
    }

    if prefix.len() > 2 && prefix[2] != 0x08 {
        return Err(GzipError::data("unknown compression method"));
    }

    Ok(())
}

impl Parser {
    fn next_state(&mut self) -> State {
        let next = [FEXTRA, FNAME, FCOMMENT, FHCRC]
            .into_iter()
            .find(|flag| self.pending & flag != 0);

        let Some(flag) = next else {
            return State::Done;
        };
        self.pending &= !flag;

        match flag {
            FEXTRA => State::ExtraLen(PartialBuffer::new([0; 2])),
            FNAME => State::Filename(Vec::new()),
            FCOMMENT => State::Comment(Vec::new()),
            _ => State::Crc(PartialBuffer::new([0; 2])),
        }
    }

    fn parse_fixed(&mut self, fixed: &[u8]) -> Result<(), GzipError> {
        check_prefix(fixed)?;

        let flags = fixed[3];
        if flags & RESERVED != 0 {
            return Err(GzipError::data("unsupported gzip header flags"));
        }

        self.pending = flags & (FEXTRA | FNAME | FCOMMENT | FHCRC);
        self.header.mtime = u32::from_le_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]);
        self.header.os = fixed[9];

        Ok(())
    }

    /// Returns the header once all of it has been consumed from `input`.
    pub(super) fn input(
        &mut self,
        input: &mut PartialBuffer<&[u8]>,
    ) -> Result<Option<Header>, GzipError> {
        loop {
            match &mut self.state {
                State::Fixed(data) => {
                    data.copy_unwritten_from(input);
                    check_prefix(data.written())?;
                    if !data.unwritten().is_empty() {
                        return Ok(None);
                    }

                    let mut fixed = [0; 10];
                    fixed.copy_from_slice(data.written());
                    self.parse_fixed(&fixed)?;
                    self.state = self.next_state();
                }

                State::ExtraLen(data) => {
                    data.copy_unwritten_from(input);
                    if !data.unwritten().is_empty() {
                        return Ok(None);
                    }

                    let len = data.written();
                    let len = u16::from_le_bytes([len[0], len[1]]) as usize;
                    self.state = State::Extra(PartialBuffer::new(vec![0; len]));
                }

                State::Extra(data) => {
                    data.copy_unwritten_from(input);
                    if !data.unwritten().is_empty() {
                        return Ok(None);
                    }

                    self.header.extra = Some(std::mem::take(data).into_inner());
                    self.state = self.next_state();
                }

                State::Filename(name) => {
                    if !read_to_nul(input, name) {
                        return Ok(None);
                    }

                    self.header.filename = Some(std::mem::take(name));
                    self.state = self.next_state();
                }

                State::Comment(comment) => {
                    if !read_to_nul(input, comment) {
                        return Ok(None);
                    }

                    self.header.comment = Some(std::mem::take(comment));
                    self.state = self.next_state();
                }

                // The header CRC is skipped, the trailer CRC covers the payload.
                State::Crc(data) => {
                    data.copy_unwritten_from(input);
                    if !data.unwritten().is_empty() {
                        return Ok(None);
                    }

                    self.state = self.next_state();
                }

                State::Done => return Ok(Some(std::mem::take(&mut self.header))),
            }
        }
    }
}
