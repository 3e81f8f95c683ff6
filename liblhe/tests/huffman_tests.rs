//! Tests for the canonical Huffman coder used on symbol streams.

use liblhe_audio::core::huffman::{self, HuffmanTable, MAX_CODE_LENGTH};
use liblhe_audio::LheError;

fn skewed_stream(len: usize) -> Vec<u8> {
    // mostly null symbols with the odd hop, like a quiet passage
    (0..len)
        .map(|i| match i % 16 {
            0 => b'2',
            5 => b'3',
            9 => b'X',
            _ => b'1',
        })
        .collect()
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_from_data() {
    let table = HuffmanTable::from_data(b"aaaabbc");
    assert_eq!(table.len(), 3);
    assert_eq!(table.code_length(b'a'), 1);
    assert_eq!(table.code_length(b'b'), 2);
    assert_eq!(table.code_length(b'c'), 2);
    assert_eq!(table.code_length(b'z'), 0);
}

#[test]
fn test_single_symbol_table() {
    let table = HuffmanTable::from_data(b"1111");
    assert_eq!(table.len(), 1);
    assert_eq!(table.code_length(b'1'), 1);
}

#[test]
fn test_empty_table() {
    let table = HuffmanTable::from_data(&[]);
    assert!(table.is_empty());
}

#[test]
fn test_code_lengths_limited() {
    // Fibonacci frequencies give a maximally deep tree
    let mut frequencies = [0u64; 256];
    let (mut a, mut b) = (1u64, 1u64);
    for f in frequencies.iter_mut().take(48) {
        *f = a;
        let next = a + b;
        a = b;
        b = next;
    }

    let table = HuffmanTable::from_frequencies(&frequencies);
    assert_eq!(table.len(), 48);
    for symbol in 0..48u8 {
        let len = table.code_length(symbol);
        assert!(len >= 1 && len <= MAX_CODE_LENGTH);
    }
}

// ============================================================================
// Stream Tests
// ============================================================================

#[test]
fn test_stream_round_trip() {
    let data = skewed_stream(10_000);
    let encoded = huffman::encode(&data);

    assert_eq!(huffman::decode(&encoded).unwrap(), data);
}

#[test]
fn test_skewed_stream_compresses() {
    let data = skewed_stream(10_000);
    let encoded = huffman::encode(&data);

    // 1.5 bits per symbol at most for this distribution
    assert!(encoded.len() < data.len() / 4);
}

#[test]
fn test_empty_stream() {
    let encoded = huffman::encode(&[]);
    assert_eq!(encoded.len(), 6);
    assert!(huffman::decode(&encoded).unwrap().is_empty());
}

#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
    let encoded = huffman::encode(&data);

    assert_eq!(huffman::decode(&encoded).unwrap(), data);
}

#[test]
fn test_decode_prefix_reports_length() {
    let first = huffman::encode(b"11112111311");
    let second = huffman::encode(b"X1X2");

    let mut joined = first.clone();
    joined.extend(&second);

    let (decoded, consumed) = huffman::decode_prefix(&joined).unwrap();
    assert_eq!(decoded, b"11112111311");
    assert_eq!(consumed, first.len());

    let (decoded, consumed) = huffman::decode_prefix(&joined[consumed..]).unwrap();
    assert_eq!(decoded, b"X1X2");
    assert_eq!(consumed, second.len());
}

// ============================================================================
// Corruption Tests
// ============================================================================

#[test]
fn test_truncated_header() {
    let result = huffman::decode(&[1, 0, 0]);
    assert!(matches!(result, Err(LheError::EntropyCodec(_))));
}

#[test]
fn test_truncated_bitstream() {
    let encoded = huffman::encode(&skewed_stream(1000));
    let result = huffman::decode(&encoded[..encoded.len() - 10]);
    assert!(matches!(result, Err(LheError::EntropyCodec(_))));
}

#[test]
fn test_zero_code_length_rejected() {
    let mut encoded = huffman::encode(b"1122");
    // first table entry's length byte
    encoded[7] = 0;
    assert!(matches!(
        huffman::decode(&encoded),
        Err(LheError::EntropyCodec(_))
    ));
}

#[test]
fn test_oversubscribed_table_rejected() {
    // three one-bit codes cannot coexist
    let stream = [3, 0, 0, 0, 3, 0, b'a', 1, b'b', 1, b'c', 1, 0];
    assert!(matches!(
        huffman::decode(&stream),
        Err(LheError::EntropyCodec(_))
    ));
}

#[test]
fn test_count_without_table_rejected() {
    let stream = [5, 0, 0, 0, 0, 0, 0xff];
    assert!(matches!(
        huffman::decode(&stream),
        Err(LheError::EntropyCodec(_))
    ));
}

#[test]
fn test_count_larger_than_bitstream_rejected() {
    let stream = [0xff, 0xff, 0xff, 0x7f, 1, 0, b'1', 1, 0];
    assert!(matches!(
        huffman::decode(&stream),
        Err(LheError::EntropyCodec(_))
    ));
}
