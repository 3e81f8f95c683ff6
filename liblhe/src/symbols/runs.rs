//! Adaptive run compression of null-hop symbols
//!
//! A run of `threshold` consecutive null symbols collapses into one
//! meta-symbol and the threshold grows by 2. A short run (no meta-symbol)
//! ended by another symbol relaxes the threshold to `ceil((threshold + 8) / 2)`.
//! Both directions drive the same [`SymbolRunState`], event for event.

use tracing::debug;

use super::priority::PriorityTable;
use crate::core::{
    LheError, LheResult, INITIAL_RUN_THRESHOLD, META_SYMBOL, RUN_THRESHOLD_GROWTH,
    RUN_THRESHOLD_RELAX_TARGET,
};
use crate::quantizer::HopLevel;

/// What a null symbol does to the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// stays a literal null symbol
    Literal,
    /// the run reached the threshold; this many nulls become one meta-symbol
    Collapse(u32),
}

/// Threshold state of one symbol pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRunState {
    /// current run length a meta-symbol stands for (x_length)
    threshold: u32,
    /// the current run already produced a meta-symbol
    in_chain: bool,
    /// literal nulls since the last collapse or interruption
    pending: u32,
}

impl SymbolRunState {
    pub fn new() -> Self {
        SymbolRunState {
            threshold: INITIAL_RUN_THRESHOLD,
            in_chain: false,
            pending: 0,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn in_chain(&self) -> bool {
        self.in_chain
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// One more null hop in the current run
    pub fn push_null(&mut self) -> RunEvent {
        self.pending += 1;
        if self.pending >= self.threshold {
            RunEvent::Collapse(self.collapse())
        } else {
            RunEvent::Literal
        }
    }

    /// Close a full run into a meta-symbol; returns the run length it covers
    pub fn collapse(&mut self) -> u32 {
        let covered = self.threshold;
        self.pending = 0;
        self.in_chain = true;
        self.threshold += RUN_THRESHOLD_GROWTH;
        covered
    }

    /// A non-null symbol ends the current run
    pub fn interrupt(&mut self) {
        if self.pending != 0 && !self.in_chain {
            self.threshold = (self.threshold + RUN_THRESHOLD_RELAX_TARGET).div_ceil(2);
        }
        self.pending = 0;
        self.in_chain = false;
    }
}

impl Default for SymbolRunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Hops to run-compressed symbols
pub fn encode_symbols(hops: &[HopLevel], table: &PriorityTable) -> LheResult<Vec<u8>> {
    let center = table.center();
    let null_symbol = table.center_symbol();
    let mut state = SymbolRunState::new();
    let mut symbols = Vec::with_capacity(hops.len());

    for &hop in hops {
        if hop == center {
            match state.push_null() {
                RunEvent::Literal => symbols.push(null_symbol),
                RunEvent::Collapse(run) => {
                    // the run's earlier nulls were written as literals
                    let literals = (run - 1) as usize;
                    symbols.truncate(symbols.len() - literals);
                    symbols.push(META_SYMBOL);
                }
            }
        } else {
            let symbol = table.symbol(hop).ok_or_else(|| {
                LheError::config(format!("hop level {} is outside the alphabet", hop))
            })?;
            symbols.push(symbol);
            state.interrupt();
        }
    }

    debug!(
        hops = hops.len(),
        symbols = symbols.len(),
        final_threshold = state.threshold(),
        "compressed symbol runs"
    );
    Ok(symbols)
}

/// Run-compressed symbols back to hops
pub fn decode_symbols(symbols: &[u8], table: &PriorityTable) -> LheResult<Vec<HopLevel>> {
    decode_symbols_with_limit(symbols, table, usize::MAX)
}

/// Like [`decode_symbols`], failing once more than `max_hops` hops come out
pub fn decode_symbols_with_limit(
    symbols: &[u8],
    table: &PriorityTable,
    max_hops: usize,
) -> LheResult<Vec<HopLevel>> {
    let center = table.center();
    let null_symbol = table.center_symbol();
    let mut state = SymbolRunState::new();
    let mut hops = Vec::with_capacity(symbols.len());

    for (position, &symbol) in symbols.iter().enumerate() {
        if symbol == META_SYMBOL {
            // a meta-symbol always starts right after a collapse or a non-null symbol
            if state.pending() != 0 {
                return Err(LheError::InvalidSymbol { symbol, position });
            }
            let run = state.collapse();
            if hops.len() + run as usize > max_hops {
                return Err(LheError::container(format!(
                    "symbol stream expands past {} samples",
                    max_hops
                )));
            }
            hops.extend(std::iter::repeat(center).take(run as usize));
        } else if symbol == null_symbol {
            // a literal can never complete a run; the encoder would have collapsed it
            if state.push_null() != RunEvent::Literal {
                return Err(LheError::InvalidSymbol { symbol, position });
            }
            hops.push(center);
        } else {
            let level = table
                .level(symbol)
                .ok_or(LheError::InvalidSymbol { symbol, position })?;
            hops.push(level);
            state.interrupt();
        }
    }

    debug!(
        symbols = symbols.len(),
        hops = hops.len(),
        "expanded symbol runs"
    );
    Ok(hops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_growth() {
        let mut state = SymbolRunState::new();
        for _ in 0..7 {
            assert_eq!(state.push_null(), RunEvent::Literal);
        }
        assert_eq!(state.push_null(), RunEvent::Collapse(8));
        assert_eq!(state.threshold(), 10);
        assert!(state.in_chain());
    }

    #[test]
    fn test_threshold_relax() {
        let mut state = SymbolRunState::new();
        state.push_null();
        state.collapse();
        state.interrupt();
        assert_eq!(state.threshold(), 10);

        // short run: ceil((10 + 8) / 2) = 9
        state.push_null();
        state.interrupt();
        assert_eq!(state.threshold(), 9);

        // ceil((9 + 8) / 2) = 9
        state.push_null();
        state.interrupt();
        assert_eq!(state.threshold(), 9);
    }

    #[test]
    fn test_no_relax_after_chain() {
        let mut state = SymbolRunState::new();
        for _ in 0..8 {
            state.push_null();
        }
        state.push_null();
        state.push_null();
        state.interrupt();
        assert_eq!(state.threshold(), 10);
    }

    #[test]
    fn test_interrupt_without_run_keeps_threshold() {
        let mut state = SymbolRunState::new();
        state.interrupt();
        state.interrupt();
        assert_eq!(state.threshold(), 8);
    }
}
