use chunkpress::{Algorithm, CompressionError, compress, decompress};
use proptest::prelude::*;

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_roundtrip(
        data in proptest::collection::vec(any::<u8>(), 1..8192),
        algorithm in algorithm(),
        buffer_size in 1usize..20_000
    ) {
        let packed = compress(&data, algorithm, buffer_size).unwrap();
        let restored = decompress(&packed, algorithm, buffer_size).unwrap();
        prop_assert_eq!(restored, data);
    }

    #[test]
    fn prop_buffer_size_does_not_change_output(
        data in proptest::collection::vec(0u8..8, 1..8192),
        algorithm in algorithm(),
        a in 1usize..5000,
        b in 1usize..5000
    ) {
        let left = compress(&data, algorithm, a).unwrap();
        let right = compress(&data, algorithm, b).unwrap();
        prop_assert_eq!(&left, &right);
        prop_assert_eq!(
            decompress(&left, algorithm, a).unwrap(),
            decompress(&right, algorithm, b).unwrap()
        );
    }

    #[test]
    fn prop_garbage_never_panics(
        data in proptest::collection::vec(any::<u8>(), 1..2048),
        algorithm in algorithm()
    ) {
        match decompress(&data, algorithm, 4096) {
            Ok(_) => {}
            Err(CompressionError::InitError { algorithm: a, .. })
            | Err(CompressionError::ProcessError { algorithm: a, .. }) => prop_assert_eq!(a, algorithm),
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }
}
