#![allow(dead_code)] // Different tests use a different subset of functions

use gzstream::{
    flate2::{read::GzDecoder, write::GzEncoder, Compression},
    read::{DecoderOptions, GzipDecoder},
    write::{EncoderOptions, GzipEncoder},
    MemoryReader, MemoryWriter, PullEndpoint, Result,
};
use proptest_derive::Arbitrary;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{self, Read, Write};

pub const SIZES: &[usize] = &[1, 10, 32, 128, 256, 1000, 1024, 2048];
pub const CHUNK_SIZES: &[usize] = &[8, 32, 256, 1024];

/// Uncompressed input handed to the encoder as a series of separate writes.
#[derive(Arbitrary, Debug)]
pub struct InputStream(Vec<Vec<u8>>);

impl InputStream {
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter().map(Vec::as_slice)
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.0.iter().flatten().cloned().collect()
    }
}

impl From<Vec<Vec<u8>>> for InputStream {
    fn from(input: Vec<Vec<u8>>) -> InputStream {
        InputStream(input)
    }
}

/// Highly compressible: runs of ten equal bytes.
pub fn fluffy(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i / 10) as u8).collect()
}

/// Incompressible, and never starting with the gzip magic byte.
pub fn random(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0; len];
    StdRng::seed_from_u64(seed).fill(&mut data[..]);
    if let Some(first) = data.first_mut() {
        if *first == 0x1f {
            *first = 0;
        }
    }
    data
}

pub fn compress_stream(input: &InputStream, options: EncoderOptions) -> Vec<u8> {
    let mut encoder = GzipEncoder::with_options(MemoryWriter::new(), options);
    encoder.open().unwrap();
    for chunk in input.chunks() {
        encoder.write(chunk).unwrap();
    }
    encoder.finish().unwrap().into_inner()
}

pub fn compress_with(data: &[u8], options: EncoderOptions) -> Vec<u8> {
    compress_stream(&InputStream(vec![data.to_vec()]), options)
}

pub fn compress(data: &[u8]) -> Vec<u8> {
    compress_with(data, EncoderOptions::default())
}

/// Drains `decoder` with reads of `read_size` bytes until it reports the end of the stream.
pub fn read_to_end<R: PullEndpoint>(decoder: &mut GzipDecoder<R>, read_size: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut buf = vec![0; read_size];
    loop {
        let len = decoder.read(&mut buf)?;
        if len == 0 {
            return Ok(output);
        }
        output.extend_from_slice(&buf[..len]);
    }
}

pub fn decompress_with(compressed: &[u8], options: DecoderOptions, read_size: usize) -> Result<Vec<u8>> {
    let mut decoder = GzipDecoder::with_options(MemoryReader::new(compressed), options);
    decoder.open()?;
    let output = read_to_end(&mut decoder, read_size)?;
    decoder.close();
    Ok(output)
}

pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    decompress_with(compressed, DecoderOptions::default(), 1024)
}

pub fn reference_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn reference_decompress(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    GzDecoder::new(compressed).read_to_end(&mut output)?;
    Ok(output)
}
