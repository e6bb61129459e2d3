#![no_main]
use chunkpress::{Algorithm, CompressionError, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let algorithm = Algorithm::ALL[selector as usize % Algorithm::ALL.len()];
    let buffer_size = 1 + (selector as usize >> 2) * 64;

    // Arbitrary input must fail cleanly, never panic.
    match decompress(payload, algorithm, buffer_size) {
        Ok(_) => {}
        Err(CompressionError::EmptyData) => assert!(payload.is_empty()),
        Err(CompressionError::InitError { .. } | CompressionError::ProcessError { .. }) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
});
