//! Hop level <-> symbol translation for lhe
//!
//! A priority remap gives the cheapest symbols to the most frequent hops,
//! then adaptive run compression folds runs of null hops into a meta-symbol.
//! Symbols are one byte each, ready for the entropy coder.

pub mod priority;
pub mod runs;

pub use priority::PriorityTable;
pub use runs::{
    decode_symbols, decode_symbols_with_limit, encode_symbols, RunEvent, SymbolRunState,
};

use crate::core::LheResult;
use crate::quantizer::{HopLevel, LheConfig};

/// Both directions of the symbol codec for one alphabet
#[derive(Debug, Clone)]
pub struct SymbolCodec {
    table: PriorityTable,
}

impl SymbolCodec {
    pub fn new(config: &LheConfig) -> LheResult<Self> {
        Ok(SymbolCodec {
            table: PriorityTable::new(config)?,
        })
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    /// hops to symbols; every call starts a fresh run state
    pub fn encode(&self, hops: &[HopLevel]) -> LheResult<Vec<u8>> {
        encode_symbols(hops, &self.table)
    }

    /// symbols to hops; every call starts a fresh run state
    pub fn decode(&self, symbols: &[u8]) -> LheResult<Vec<HopLevel>> {
        decode_symbols(symbols, &self.table)
    }

    /// symbols to at most `max_hops` hops
    pub fn decode_with_limit(&self, symbols: &[u8], max_hops: usize) -> LheResult<Vec<HopLevel>> {
        decode_symbols_with_limit(symbols, &self.table, max_hops)
    }
}
