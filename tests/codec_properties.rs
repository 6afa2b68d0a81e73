//! Property tests for the Plutus Data and metadata datum encodings.

use medrec_sdk::prelude::*;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Integers biased toward the 64-bit and 128-bit edges.
fn integer() -> impl Strategy<Value = i128> {
    prop_oneof![
        any::<i64>().prop_map(i128::from),
        any::<i128>(),
        Just(u64::MAX as i128),
        Just(u64::MAX as i128 + 1),
        Just(-(u64::MAX as i128) - 1),
        Just(-(u64::MAX as i128) - 2),
        Just(i128::MAX),
        Just(i128::MIN),
    ]
}

/// Constructor indexes around each tag range boundary.
fn constructor() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0u64),
        Just(6),
        Just(7),
        Just(127),
        Just(128),
        0u64..1000,
        any::<u64>(),
    ]
}

/// Byte strings on both sides of the 64-byte chunk limit.
fn bytes() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..200)
}

fn plutus_data() -> impl Strategy<Value = PlutusData> {
    let leaf = prop_oneof![
        integer().prop_map(PlutusData::Integer),
        bytes().prop_map(PlutusData::Bytes),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            (constructor(), vec(inner.clone(), 0..5))
                .prop_map(|(tag, fields)| PlutusData::Constr { tag, fields }),
            vec(inner.clone(), 0..5).prop_map(PlutusData::List),
            btree_map(inner.clone(), inner, 0..5).prop_map(PlutusData::Map),
        ]
    })
}

fn meta_datum() -> impl Strategy<Value = MetaDatum> {
    (
        btree_map(plutus_data(), plutus_data(), 0..5),
        any::<u64>(),
        bytes(),
    )
        .prop_map(|(metadata, version, extra)| MetaDatum::new(metadata, version, extra))
}

// =============================================================================
// Plutus Data
// =============================================================================

mod data {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn test_cbor_round_trip(data in plutus_data()) {
            let cbor = data.to_cbor();
            prop_assert_eq!(PlutusData::from_cbor(&cbor).unwrap(), data.clone());
            prop_assert_eq!(PlutusData::from_cbor_hex(&hex::encode(&cbor)).unwrap(), data);
        }

        #[test]
        fn test_json_round_trip(data in plutus_data()) {
            prop_assert_eq!(PlutusData::from_json(&data.to_json()).unwrap(), data.clone());

            let text = serde_json::to_string(&data).unwrap();
            let back: PlutusData = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(back, data);
        }

        #[test]
        fn test_trailing_byte_rejected(data in plutus_data(), extra in any::<u8>()) {
            let mut cbor = data.to_cbor();
            cbor.push(extra);
            prop_assert!(PlutusData::from_cbor(&cbor).is_err());
        }
    }
}

// =============================================================================
// Metadata Datum
// =============================================================================

mod datum {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_cbor_round_trip(datum in meta_datum()) {
            prop_assert_eq!(MetaDatum::from_cbor(&datum.to_cbor()).unwrap(), datum);
        }

        #[test]
        fn test_data_round_trip(datum in meta_datum()) {
            let data = datum.to_data();
            prop_assert_eq!(MetaDatum::from_data(&data).unwrap(), datum.clone());

            let json = data.to_json();
            let back = PlutusData::from_json(&json).unwrap();
            prop_assert_eq!(MetaDatum::from_data(&back).unwrap(), datum);
        }
    }
}
