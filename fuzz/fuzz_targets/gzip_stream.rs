#![no_main]
use libfuzzer_sys::fuzz_target;

use gzstream::{
    read::{DecoderOptions, GzipDecoder},
    write::{EncoderOptions, GzipEncoder},
    Level, MemoryReader, MemoryWriter,
};

fuzz_target!(|data: Vec<Vec<u8>>| {
    let expected: Vec<u8> = data.iter().flatten().copied().collect();

    let mut encoder = GzipEncoder::with_options(
        MemoryWriter::new(),
        EncoderOptions::default().level(Level::Fastest).chunk_size(97),
    );
    encoder.open().unwrap();
    for chunk in &data {
        encoder.write(chunk).unwrap();
    }
    let compressed = encoder.finish().unwrap().into_inner();

    let mut decoder = GzipDecoder::with_options(
        MemoryReader::new(compressed),
        DecoderOptions::default().in_chunk_size(13).out_chunk_size(31),
    );
    decoder.open().unwrap();
    let mut decoded = Vec::new();
    let mut buf = [0; 53];
    loop {
        let len = decoder.read(&mut buf).unwrap();
        if len == 0 {
            break;
        }
        decoded.extend_from_slice(&buf[..len]);
    }
    decoder.close();

    assert_eq!(expected, decoded);
});
