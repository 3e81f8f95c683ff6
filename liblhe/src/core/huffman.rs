//! Canonical Huffman coding for symbol streams
//!
//! Stream layout:
//!
//! | Field        | Size          | Notes                               |
//! |--------------|---------------|-------------------------------------|
//! | symbol count | 4 (u32 LE)    | bytes in the decoded stream         |
//! | table size   | 2 (u16 LE)    | number of (symbol, length) entries  |
//! | table        | 2 per entry   | symbol byte, code length in bits    |
//! | bitstream    | rest          | MSB first, zero-padded to a byte    |
//!
//! Codes are canonical, so only lengths are stored. Streams are
//! self-delimiting: `decode_prefix` reports how many bytes it consumed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::bitio::{BitReader, BitWriter};
use super::error::{LheError, LheResult};

/// Longest code the table format allows
pub const MAX_CODE_LENGTH: u8 = 32;

const STREAM_HEADER_SIZE: usize = 6;

/// canonical code table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    /// (symbol, length) sorted by length then symbol
    entries: Vec<(u8, u8)>,
    /// code per symbol, valid when the symbol has a length
    codes: [u32; 256],
    lengths: [u8; 256],
}

impl HuffmanTable {
    /// Build a length-limited table from byte frequencies
    pub fn from_frequencies(frequencies: &[u64; 256]) -> Self {
        let mut freqs = *frequencies;
        loop {
            let lengths = code_lengths(&freqs);
            let longest = lengths.iter().copied().max().unwrap_or(0);
            if longest <= MAX_CODE_LENGTH {
                return Self::from_lengths(&lengths);
            }
            // flatten the distribution until the tree is shallow enough
            for f in freqs.iter_mut().filter(|f| **f > 0) {
                *f = (*f >> 1).max(1);
            }
        }
    }

    pub fn from_data(data: &[u8]) -> Self {
        let mut frequencies = [0u64; 256];
        for &byte in data {
            frequencies[byte as usize] += 1;
        }
        Self::from_frequencies(&frequencies)
    }

    /// Assign canonical codes to per-symbol lengths (0 = absent)
    fn from_lengths(lengths: &[u8; 256]) -> Self {
        let mut entries: Vec<(u8, u8)> = (0..=255u8)
            .filter(|&s| lengths[s as usize] > 0)
            .map(|s| (s, lengths[s as usize]))
            .collect();
        entries.sort_by_key(|&(symbol, len)| (len, symbol));

        let mut codes = [0u32; 256];
        let mut code: u64 = 0;
        let mut prev_len = entries.first().map(|&(_, len)| len).unwrap_or(0);
        for &(symbol, len) in &entries {
            code <<= len - prev_len;
            codes[symbol as usize] = code as u32;
            code += 1;
            prev_len = len;
        }

        HuffmanTable {
            entries,
            codes,
            lengths: *lengths,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// code length of a symbol, 0 when absent
    pub fn code_length(&self, symbol: u8) -> u8 {
        self.lengths[symbol as usize]
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.entries.len() as u16).to_le_bytes());
        for &(symbol, len) in &self.entries {
            out.push(symbol);
            out.push(len);
        }
    }

    fn read_from(data: &[u8], count: usize) -> LheResult<Self> {
        if data.len() < count * 2 {
            return Err(LheError::entropy("truncated code table"));
        }

        let mut lengths = [0u8; 256];
        for pair in data[..count * 2].chunks_exact(2) {
            let (symbol, len) = (pair[0], pair[1]);
            if len == 0 || len > MAX_CODE_LENGTH {
                return Err(LheError::entropy(format!(
                    "code length {} out of range for symbol {:#04x}",
                    len, symbol
                )));
            }
            if lengths[symbol as usize] != 0 {
                return Err(LheError::entropy(format!(
                    "symbol {:#04x} listed twice",
                    symbol
                )));
            }
            lengths[symbol as usize] = len;
        }

        // Kraft sum must not exceed 1 or codes would collide
        let kraft: u64 = lengths
            .iter()
            .filter(|&&l| l > 0)
            .map(|&l| 1u64 << (MAX_CODE_LENGTH - l))
            .sum();
        if kraft > 1u64 << MAX_CODE_LENGTH {
            return Err(LheError::entropy("code table is over-subscribed"));
        }

        Ok(Self::from_lengths(&lengths))
    }
}

/// Huffman code lengths for the non-zero frequencies
fn code_lengths(frequencies: &[u64; 256]) -> [u8; 256] {
    let mut lengths = [0u8; 256];

    // arena of nodes: leaves first, then merges; parent links give depths
    let mut parent: Vec<usize> = Vec::with_capacity(512);
    let mut heap = BinaryHeap::new();
    let mut leaves = Vec::new();

    for (symbol, &freq) in frequencies.iter().enumerate() {
        if freq > 0 {
            let id = parent.len();
            parent.push(usize::MAX);
            leaves.push((symbol, id));
            // node id breaks frequency ties so the tree is deterministic
            heap.push(Reverse((freq, id)));
        }
    }

    match leaves.len() {
        0 => return lengths,
        1 => {
            lengths[leaves[0].0] = 1;
            return lengths;
        }
        _ => {}
    }

    while let (Some(Reverse((fa, a))), Some(Reverse((fb, b)))) = (heap.pop(), heap.pop()) {
        let id = parent.len();
        parent.push(usize::MAX);
        parent[a] = id;
        parent[b] = id;
        if heap.is_empty() {
            break;
        }
        heap.push(Reverse((fa + fb, id)));
    }

    for (symbol, id) in leaves {
        let mut depth = 0usize;
        let mut node = id;
        while parent[node] != usize::MAX {
            node = parent[node];
            depth += 1;
        }
        lengths[symbol] = depth.min(u8::MAX as usize) as u8;
    }

    lengths
}

/// Huffman encode a byte stream
pub fn encode(data: &[u8]) -> Vec<u8> {
    let table = HuffmanTable::from_data(data);

    let mut out = Vec::with_capacity(STREAM_HEADER_SIZE + table.len() * 2 + data.len() / 2);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    table.write_to(&mut out);

    let mut bits = BitWriter::new();
    for &byte in data {
        let len = table.lengths[byte as usize];
        bits.write_bits(table.codes[byte as usize], len);
    }
    out.extend(bits.into_bytes());
    out
}

/// Huffman decode a complete stream
pub fn decode(data: &[u8]) -> LheResult<Vec<u8>> {
    let (decoded, _) = decode_prefix(data)?;
    Ok(decoded)
}

/// Decode one stream from the front of `data`
///
/// # Returns
/// The decoded bytes and the number of input bytes the stream occupied
pub fn decode_prefix(data: &[u8]) -> LheResult<(Vec<u8>, usize)> {
    if data.len() < STREAM_HEADER_SIZE {
        return Err(LheError::entropy("truncated stream header"));
    }
    let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let table_size = u16::from_le_bytes([data[4], data[5]]) as usize;

    let table = HuffmanTable::read_from(&data[STREAM_HEADER_SIZE..], table_size)?;
    let bits_start = STREAM_HEADER_SIZE + table_size * 2;

    if count == 0 {
        return Ok((Vec::new(), bits_start));
    }
    if table.is_empty() {
        return Err(LheError::entropy(format!(
            "{} symbols announced with an empty code table",
            count
        )));
    }
    // every symbol costs at least one bit
    let available_bits = (data.len() - bits_start).saturating_mul(8);
    if count > available_bits {
        return Err(LheError::entropy(format!(
            "{} symbols announced but only {} bits follow",
            count, available_bits
        )));
    }

    // per length: first canonical code and index of its first entry
    let mut first_code = [0u64; MAX_CODE_LENGTH as usize + 2];
    let mut first_index = [0usize; MAX_CODE_LENGTH as usize + 2];
    let mut len_count = [0usize; MAX_CODE_LENGTH as usize + 2];
    for &(_, len) in &table.entries {
        len_count[len as usize] += 1;
    }
    let mut code = 0u64;
    let mut index = 0usize;
    for len in 1..=MAX_CODE_LENGTH as usize {
        first_code[len] = code;
        first_index[len] = index;
        code = (code + len_count[len] as u64) << 1;
        index += len_count[len];
    }

    let mut reader = BitReader::new(&data[bits_start..]);
    let mut decoded = Vec::with_capacity(count);

    while decoded.len() < count {
        let mut code = 0u64;
        let mut len = 0usize;
        loop {
            let bit = reader.read_bit().ok_or_else(|| {
                LheError::entropy(format!(
                    "bitstream ended after {} of {} symbols",
                    decoded.len(),
                    count
                ))
            })?;
            code = (code << 1) | bit as u64;
            len += 1;
            if len > MAX_CODE_LENGTH as usize {
                return Err(LheError::entropy("invalid code in bitstream"));
            }
            let offset = code.wrapping_sub(first_code[len]);
            if code >= first_code[len] && (offset as usize) < len_count[len] {
                decoded.push(table.entries[first_index[len] + offset as usize].0);
                break;
            }
        }
    }

    Ok((decoded, bits_start + reader.bytes_consumed()))
}
