#![no_main]
use chunkpress::{Algorithm, compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the algorithm and the scratch buffer size.
    let flags = data[0];
    let payload = &data[1..];
    let algorithm = Algorithm::ALL[flags as usize % Algorithm::ALL.len()];
    let buffer_size = 1 + (flags as usize >> 2) * 97;

    let packed = compress(payload, algorithm, buffer_size).unwrap();
    let restored = decompress(&packed, algorithm, buffer_size).unwrap();
    assert_eq!(restored, payload);
});
