// Integration tests for the one-call compress/decompress API.
//
// Covers round trips for every algorithm, buffer-size independence,
// the error taxonomy (empty input, init failure on foreign data, process
// failure on corrupt bodies) and decoding of hand-built streams.

use chunkpress::codec::{self, Codec, CodecId};
use chunkpress::{Algorithm, CompressionError, DEFAULT_BUFFER_SIZE, compress, decompress};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LOREM: &[u8] = include_bytes!("data/lorem.txt");

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn roundtrip(data: &[u8], algorithm: Algorithm, buffer_size: usize) -> Vec<u8> {
    let packed = compress(data, algorithm, buffer_size).unwrap();
    let restored = decompress(&packed, algorithm, buffer_size).unwrap();
    assert_eq!(
        restored,
        data,
        "roundtrip mismatch ({algorithm}, buffer={buffer_size}, packed={})",
        packed.len()
    );
    packed
}

fn random_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; size];
    rng.fill(&mut data[..]);
    data
}

fn repetitive_data(pattern: &[u8], total: usize) -> Vec<u8> {
    pattern.iter().copied().cycle().take(total).collect()
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn lorem_every_algorithm() {
    for algorithm in Algorithm::ALL {
        let packed = roundtrip(LOREM, algorithm, DEFAULT_BUFFER_SIZE);
        assert!(
            packed.len() < LOREM.len(),
            "{algorithm}: {} >= {}",
            packed.len(),
            LOREM.len()
        );
    }
}

#[test]
fn lorem_default_algorithm() {
    let packed = roundtrip(LOREM, Algorithm::default(), DEFAULT_BUFFER_SIZE);
    assert_eq!(
        packed,
        compress(LOREM, Algorithm::PlatformOptimized, DEFAULT_BUFFER_SIZE).unwrap()
    );
}

#[test]
fn single_byte_input() {
    for algorithm in Algorithm::ALL {
        roundtrip(b"x", algorithm, DEFAULT_BUFFER_SIZE);
    }
}

#[test]
fn incompressible_data() {
    let data = random_bytes(50_000, 7);
    for algorithm in Algorithm::ALL {
        roundtrip(&data, algorithm, DEFAULT_BUFFER_SIZE);
    }
}

#[test]
fn large_repetitive_data() {
    let data = repetitive_data(b"chunked streaming compression ", 1 << 20);
    for algorithm in Algorithm::ALL {
        let packed = roundtrip(&data, algorithm, DEFAULT_BUFFER_SIZE);
        assert!(packed.len() < data.len(), "{algorithm}");
    }
}

#[test]
fn repeated_calls_are_independent() {
    for i in 0..100 {
        for algorithm in Algorithm::ALL {
            let packed = compress(LOREM, algorithm, DEFAULT_BUFFER_SIZE).unwrap();
            let restored = decompress(&packed, algorithm, DEFAULT_BUFFER_SIZE).unwrap();
            assert_eq!(restored, LOREM, "iteration {i}, {algorithm}");
        }
    }
}

#[test]
fn repeated_failing_calls_are_independent() {
    let data = random_bytes(8_000, 5);
    let packed: Vec<(Algorithm, Vec<u8>)> = Algorithm::ALL
        .into_iter()
        .map(|a| (a, compress(&data, a, DEFAULT_BUFFER_SIZE).unwrap()))
        .collect();

    for i in 0..100 {
        for (packed_with, stream) in &packed {
            let wrong = Algorithm::ALL[(Algorithm::ALL
                .iter()
                .position(|a| a == packed_with)
                .unwrap()
                + 1)
                % Algorithm::ALL.len()];
            let err = decompress(stream, wrong, DEFAULT_BUFFER_SIZE).unwrap_err();
            assert!(
                matches!(err, CompressionError::InitError { .. }),
                "iteration {i}, {packed_with} as {wrong}: {err}"
            );

            let truncated = &stream[..stream.len() / 2];
            let err = decompress(truncated, *packed_with, 512).unwrap_err();
            assert!(
                matches!(err, CompressionError::ProcessError { .. }),
                "iteration {i}, truncated {packed_with}: {err}"
            );
        }
    }

    // Failures leave nothing behind that affects later calls.
    for algorithm in Algorithm::ALL {
        roundtrip(&data, algorithm, DEFAULT_BUFFER_SIZE);
    }
}

#[test]
fn trailing_bytes_after_stream_fail_in_process() {
    for algorithm in Algorithm::ALL {
        let mut stream = compress(LOREM, algorithm, DEFAULT_BUFFER_SIZE).unwrap();
        stream.extend_from_slice(b"TRAILING");
        let err = decompress(&stream, algorithm, DEFAULT_BUFFER_SIZE).unwrap_err();
        assert!(
            matches!(err, CompressionError::ProcessError { .. }),
            "{algorithm}: {err}"
        );
    }
}

#[test]
fn concurrent_calls() {
    let handles: Vec<_> = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            std::thread::spawn(move || {
                for _ in 0..10 {
                    roundtrip(LOREM, algorithm, 512);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

// ---------------------------------------------------------------------------
// Buffer size independence
// ---------------------------------------------------------------------------

#[test]
fn output_does_not_depend_on_buffer_size() {
    let data = repetitive_data(LOREM, 40_000);
    for algorithm in Algorithm::ALL {
        let reference = compress(&data, algorithm, DEFAULT_BUFFER_SIZE).unwrap();
        for buffer_size in [1, 7, 512, 8192, 16384, 1 << 20] {
            let packed = compress(&data, algorithm, buffer_size).unwrap();
            assert_eq!(packed, reference, "{algorithm}, buffer={buffer_size}");
            let restored = decompress(&reference, algorithm, buffer_size).unwrap();
            assert_eq!(restored, data, "{algorithm}, buffer={buffer_size}");
        }
    }
}

#[test]
fn output_size_at_buffer_multiples() {
    for size in [4095, 4096, 4097, 8192] {
        let data = repetitive_data(b"boundary ", size);
        for algorithm in Algorithm::ALL {
            let restored = decompress(
                &compress(&data, algorithm, 4096).unwrap(),
                algorithm,
                4096,
            )
            .unwrap();
            assert_eq!(restored.len(), size, "{algorithm}");
        }
    }
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

#[test]
fn empty_input_is_empty_data() {
    for algorithm in Algorithm::ALL {
        for buffer_size in [0, 1, DEFAULT_BUFFER_SIZE] {
            assert!(matches!(
                compress(&[], algorithm, buffer_size),
                Err(CompressionError::EmptyData)
            ));
            assert!(matches!(
                decompress(&[], algorithm, buffer_size),
                Err(CompressionError::EmptyData)
            ));
        }
    }
}

#[test]
fn zero_buffer_size_is_rejected() {
    let err = compress(LOREM, Algorithm::Fast, 0).unwrap_err();
    assert!(matches!(err, CompressionError::InvalidBufferSize(0)));
    assert!(err.is_precondition());
}

#[test]
fn mismatched_algorithm_fails_at_init() {
    for packed_with in Algorithm::ALL {
        let packed = compress(LOREM, packed_with, DEFAULT_BUFFER_SIZE).unwrap();
        for decoded_with in Algorithm::ALL {
            if decoded_with == packed_with {
                continue;
            }
            let err = decompress(&packed, decoded_with, DEFAULT_BUFFER_SIZE).unwrap_err();
            assert!(
                matches!(err, CompressionError::InitError { algorithm, .. } if algorithm == decoded_with),
                "{packed_with} data decoded as {decoded_with}: {err}"
            );
        }
    }
}

#[test]
fn plain_text_fails_at_init() {
    for algorithm in Algorithm::ALL {
        let err = decompress(LOREM, algorithm, DEFAULT_BUFFER_SIZE).unwrap_err();
        assert!(
            matches!(err, CompressionError::InitError { .. }),
            "{algorithm}: {err}"
        );
        assert!(!err.is_precondition());
    }
}

#[test]
fn corrupt_body_fails_in_process() {
    let zlib = [0x78, 0x9C, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    let err = decompress(&zlib, Algorithm::Balanced, DEFAULT_BUFFER_SIZE).unwrap_err();
    assert!(matches!(err, CompressionError::ProcessError { .. }), "{err}");

    let lz4 = [0x04, 0x22, 0x4D, 0x18, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    let err = decompress(&lz4, Algorithm::Fast, DEFAULT_BUFFER_SIZE).unwrap_err();
    assert!(matches!(err, CompressionError::ProcessError { .. }), "{err}");
}

#[test]
fn truncated_stream_fails_in_process() {
    let data = random_bytes(20_000, 11);
    for algorithm in Algorithm::ALL {
        let packed = compress(&data, algorithm, DEFAULT_BUFFER_SIZE).unwrap();
        let truncated = &packed[..packed.len() / 2];
        let err = decompress(truncated, algorithm, DEFAULT_BUFFER_SIZE).unwrap_err();
        assert!(
            matches!(err, CompressionError::ProcessError { .. }),
            "{algorithm}: {err}"
        );
    }
}

// ---------------------------------------------------------------------------
// Hand-built streams
// ---------------------------------------------------------------------------

#[test]
fn decode_zlib_stored_block() {
    // CMF/FLG, final stored block of 5 bytes, adler32("hello").
    let stream = [
        0x78, 0x01, 0x01, 0x05, 0x00, 0xFA, 0xFF, b'h', b'e', b'l', b'l', b'o', 0x06, 0x2C, 0x02,
        0x15,
    ];
    let out = decompress(&stream, Algorithm::Balanced, 2).unwrap();
    assert_eq!(out, b"hello");
}

#[test]
fn decode_lz4_uncompressed_block() {
    // Frame descriptor (independent blocks, 64 KiB max), one raw block, end mark.
    let stream = [
        0x04, 0x22, 0x4D, 0x18, 0x60, 0x40, 0x82, 0x05, 0x00, 0x00, 0x80, b'h', b'e', b'l', b'l',
        b'o', 0x00, 0x00, 0x00, 0x00,
    ];
    let out = decompress(&stream, Algorithm::Fast, 3).unwrap();
    assert_eq!(out, b"hello");
}

#[test]
fn decode_lzfse_raw_block() {
    let mut stream = b"bvx-".to_vec();
    stream.extend_from_slice(&5u32.to_le_bytes());
    stream.extend_from_slice(b"hello");
    stream.extend_from_slice(b"bvx$");
    let out = decompress(&stream, Algorithm::PlatformOptimized, 4).unwrap();
    assert_eq!(out, b"hello");
}

#[test]
fn registry_is_total_and_stable() {
    let ids: Vec<CodecId> = Algorithm::ALL.into_iter().map(codec::resolve).collect();
    assert_eq!(
        ids,
        vec![CodecId::Lz4, CodecId::Zlib, CodecId::Lzma, CodecId::Lzfse]
    );
    for algorithm in Algorithm::ALL {
        let id = codec::resolve(algorithm);
        assert_eq!(codec::resolve(algorithm), id);
        assert_eq!(codec::codec_for_id(id).id(), id);
    }
}
