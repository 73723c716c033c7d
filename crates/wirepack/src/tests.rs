use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Codec;
use crate::Error;
use crate::decode_exact;
use crate::encode_to_vec;
use crate::impl_codec_struct;

fn assert_roundtrip<T: Codec + PartialEq + std::fmt::Debug>(value: T) {
    let mut buf = vec![0u8; 4096];
    let written = value.encode(&mut buf).unwrap();
    let (decoded, consumed) = T::decode(&buf[..written]).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(consumed, written, "decode consumed a different length than encode produced");
}

/// Every strict prefix of a valid encoding must fail to decode, and every
/// undersized output buffer must fail to encode.
fn assert_bounded<T: Codec + std::fmt::Debug>(value: T) {
    let full = encode_to_vec(&value, 4096).unwrap();
    for cap in 0..full.len() {
        let mut out = vec![0u8; cap];
        assert!(value.encode(&mut out).is_err(), "encode of {:?} fit in {} bytes", value, cap);
        assert!(T::decode(&full[..cap]).is_err(), "decode of {:?} accepted {} bytes", value, cap);
    }
}

// ============================================================================
//  1. SCALARS
// ============================================================================

#[test]
fn test_i32_into_exact_buffer() {
    let mut buf = [0u8; 4];
    assert_eq!(42i32.encode(&mut buf), Ok(4));

    let (x, in_len) = i32::decode(&buf).unwrap();
    assert_eq!(x, 42);
    assert_eq!(in_len, 4);
}

#[test]
fn test_i32_into_short_buffer() {
    let mut buf = [0xEEu8; 2];
    match 42i32.encode(&mut buf) {
        Err(Error::BufferFull { needed: 4, available: 2 }) => {}
        other => panic!("Expected BufferFull, got {:?}", other),
    }
    // Nothing was written.
    assert_eq!(buf, [0xEE, 0xEE]);
}

#[test]
fn test_decode_short_input() {
    match u64::decode(&[1, 2, 3]) {
        Err(Error::UnexpectedEnd { needed: 8, available: 3 }) => {}
        other => panic!("Expected UnexpectedEnd, got {:?}", other),
    }
}

#[test]
fn test_scalar_roundtrips() {
    assert_roundtrip(true);
    assert_roundtrip(false);
    assert_roundtrip(u8::MAX);
    assert_roundtrip(i8::MIN);
    assert_roundtrip(u16::MAX);
    assert_roundtrip(i16::MIN);
    assert_roundtrip(u32::MAX);
    assert_roundtrip(i32::MIN);
    assert_roundtrip(u64::MAX);
    assert_roundtrip(i64::MIN);
    assert_roundtrip(1.5f32);
    assert_roundtrip(-0.25f64);
    assert_roundtrip('λ');
    assert_roundtrip(usize::MAX);
    assert_roundtrip(isize::MIN);
    assert_roundtrip(());
}

#[test]
fn test_scalar_widths() {
    let mut buf = [0u8; 16];
    assert_eq!(true.encode(&mut buf), Ok(1));
    assert_eq!(7u16.encode(&mut buf), Ok(2));
    assert_eq!(7f32.encode(&mut buf), Ok(4));
    assert_eq!('a'.encode(&mut buf), Ok(4));
    assert_eq!(7usize.encode(&mut buf), Ok(8));
    assert_eq!((-7isize).encode(&mut buf), Ok(8));
    assert_eq!(().encode(&mut buf), Ok(0));
}

#[test]
fn test_little_endian_layout() {
    let bytes = encode_to_vec(&0x0102_0304u32, 4).unwrap();
    assert_eq!(bytes, vec![0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn test_nan_bits_survive() {
    let bytes = encode_to_vec(&f64::NAN, 8).unwrap();
    let back: f64 = decode_exact(&bytes).unwrap();
    assert_eq!(back.to_bits(), f64::NAN.to_bits());
}

#[test]
fn test_invalid_bool() {
    assert_eq!(bool::decode(&[2]), Err(Error::InvalidDiscriminant(2)));
}

#[test]
fn test_invalid_char() {
    let bytes = encode_to_vec(&0xD800u32, 4).unwrap();
    assert_eq!(char::decode(&bytes), Err(Error::InvalidChar(0xD800)));
}

#[test]
fn test_randomized_scalar_roundtrips() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..256 {
        assert_roundtrip(rng.r#gen::<u64>());
        assert_roundtrip(rng.r#gen::<i32>());
        assert_roundtrip(rng.r#gen::<i16>());
        assert_roundtrip(rng.r#gen::<f64>());
        assert_roundtrip(rng.r#gen::<char>());
    }
}

// ============================================================================
//  2. AGGREGATES
// ============================================================================

#[test]
fn test_string_roundtrip() {
    assert_roundtrip(String::new());
    assert_roundtrip("hello, wire".to_string());
    assert_roundtrip("ünïcødé ✓".to_string());
}

#[test]
fn test_string_layout() {
    let bytes = encode_to_vec(&"hi".to_string(), 16).unwrap();
    assert_eq!(bytes, vec![2, 0, 0, 0, b'h', b'i']);
}

#[test]
fn test_string_invalid_utf8() {
    let bytes = [2u8, 0, 0, 0, 0xFF, 0xFE];
    assert_eq!(String::decode(&bytes), Err(Error::InvalidUtf8));
}

#[test]
fn test_vec_roundtrip() {
    assert_roundtrip(Vec::<u32>::new());
    assert_roundtrip(vec![1u32, 2, 3]);
    assert_roundtrip(vec!["a".to_string(), String::new(), "ccc".to_string()]);
    assert_roundtrip(vec![vec![1u8], vec![], vec![2, 3]]);
}

#[test]
fn test_vec_huge_count_fails_cleanly() {
    // Claims u32::MAX items but carries none.
    let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF];
    assert!(matches!(Vec::<u64>::decode(&bytes), Err(Error::UnexpectedEnd { .. })));
}

#[test]
fn test_option_and_result_roundtrip() {
    assert_roundtrip(Some(5i64));
    assert_roundtrip(None::<i64>);
    assert_roundtrip(Ok::<u8, String>(1));
    assert_roundtrip(Err::<u8, String>("nope".into()));
    assert_roundtrip(Some(Some("nested".to_string())));
}

#[test]
fn test_option_invalid_discriminant() {
    assert_eq!(Option::<u8>::decode(&[9, 0]), Err(Error::InvalidDiscriminant(9)));
}

#[test]
fn test_array_and_box_roundtrip() {
    assert_roundtrip([1u16, 2, 3, 4]);
    assert_roundtrip([0u8; 0]);
    assert_roundtrip(Box::new(99u32));

    let bytes = encode_to_vec(&[1u8, 2, 3], 8).unwrap();
    assert_eq!(bytes, vec![1, 2, 3], "arrays carry no length prefix");
}

#[test]
fn test_tuple_concatenates_in_order() {
    let args = (1u8, 2u16, "x".to_string());
    let bytes = encode_to_vec(&args, 64).unwrap();
    assert_eq!(bytes, vec![1, 2, 0, 1, 0, 0, 0, b'x']);
    assert_roundtrip(args);
}

#[test]
fn test_tuple_arities() {
    assert_roundtrip((1u8,));
    assert_roundtrip((1u8, 2u8));
    assert_roundtrip((1u8, 2u8, 3u8));
    assert_roundtrip((1u8, 2u8, 3u8, 4u8));
    assert_roundtrip((1u8, 2u8, 3u8, 4u8, 5u8));
    assert_roundtrip((1u8, 2u8, 3u8, 4u8, 5u8, 6u8));
    assert_roundtrip((1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8));
    assert_roundtrip((1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8, 8u8));
}

#[test]
fn test_empty_tuple_is_zero_bytes() {
    assert_eq!(encode_to_vec(&(), 0).unwrap(), Vec::<u8>::new());
    assert_eq!(<()>::decode(&[]), Ok(((), 0)));
}

#[test]
fn test_aggregates_are_bounded() {
    assert_bounded(12345u32);
    assert_bounded("bounded".to_string());
    assert_bounded(vec![1i16, -1, 300]);
    assert_bounded(Some(3.5f64));
    assert_bounded((7u8, "ab".to_string(), vec![true, false]));
    assert_bounded([9u32; 3]);
}

#[test]
fn test_decode_ignores_bytes_after_value() {
    let bytes = [7u8, 0, 0, 0, 0xAA, 0xBB];
    assert_eq!(u32::decode(&bytes), Ok((7, 4)));
    assert_eq!(decode_exact::<u32>(&bytes), Err(Error::TrailingBytes(2)));
}

// ============================================================================
//  3. USER STRUCTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Account {
    id: u64,
    owner: String,
    balance: i64,
    tags: Vec<String>,
}

impl_codec_struct!(Account { id, owner, balance, tags });

#[derive(Debug, Clone, PartialEq)]
struct Empty {}

impl_codec_struct!(Empty {});

#[test]
fn test_struct_roundtrip() {
    let account = Account {
        id: 17,
        owner: "ada".into(),
        balance: -250,
        tags: vec!["vip".into(), "eu".into()],
    };
    assert_roundtrip(account.clone());
    assert_bounded(account);
    assert_roundtrip(Empty {});
}

#[test]
fn test_struct_matches_tuple_layout() {
    let account = Account { id: 1, owner: "o".into(), balance: 2, tags: vec![] };
    let as_struct = encode_to_vec(&account, 128).unwrap();
    let as_tuple = encode_to_vec(&(1u64, "o".to_string(), 2i64, Vec::<String>::new()), 128).unwrap();
    assert_eq!(as_struct, as_tuple);
}

#[test]
fn test_struct_fails_fast_on_field() {
    let account = Account { id: 1, owner: "owner".into(), balance: 2, tags: vec![] };
    let mut out = [0u8; 10];
    // Fits `id` but not `owner`.
    match account.encode(&mut out) {
        Err(Error::BufferFull { needed: 4, available: 2 }) => {}
        other => panic!("Expected BufferFull on owner, got {:?}", other),
    }
}
