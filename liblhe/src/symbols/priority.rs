use crate::core::{LheResult, META_SYMBOL};
use crate::quantizer::{HopLevel, LheConfig};

/// Fixed permutation between hop levels and symbol bytes
#[derive(Debug, Clone)]
pub struct PriorityTable {
    to_symbol: Vec<u8>,
    to_level: [Option<HopLevel>; 256],
    center: HopLevel,
}

impl PriorityTable {
    pub fn new(config: &LheConfig) -> LheResult<Self> {
        config.validate()?;

        let mut to_level = [None; 256];
        for (level, &symbol) in config.priority_table.iter().enumerate() {
            to_level[symbol as usize] = Some(level as HopLevel);
        }

        Ok(PriorityTable {
            to_symbol: config.priority_table.clone(),
            to_level,
            center: config.center() as HopLevel,
        })
    }

    /// symbol for a hop level
    pub fn symbol(&self, level: HopLevel) -> Option<u8> {
        self.to_symbol.get(level as usize).copied()
    }

    /// hop level for a symbol, None for the meta-symbol or unknown bytes
    pub fn level(&self, symbol: u8) -> Option<HopLevel> {
        self.to_level[symbol as usize]
    }

    /// null hop level
    pub fn center(&self) -> HopLevel {
        self.center
    }

    /// symbol of the null hop
    pub fn center_symbol(&self) -> u8 {
        self.to_symbol[self.center as usize]
    }

    pub fn is_meta(symbol: u8) -> bool {
        symbol == META_SYMBOL
    }
}
