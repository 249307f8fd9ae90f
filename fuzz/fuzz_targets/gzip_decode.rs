#![no_main]
use libfuzzer_sys::fuzz_target;

use gzstream::{
    read::{DecoderOptions, GzipDecoder},
    Container, MemoryReader,
};

fuzz_target!(|data: &[u8]| {
    let mut decoder = GzipDecoder::with_options(
        MemoryReader::new(data),
        DecoderOptions::default()
            .container(Container::Auto)
            .multiple_members(true)
            .in_chunk_size(64),
    );
    decoder.open().unwrap();

    let mut buf = [0; 256];
    while let Ok(len) = decoder.read(&mut buf) {
        if len == 0 {
            break;
        }
    }
    decoder.close();
});
