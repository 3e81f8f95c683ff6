use serde::{Deserialize, Serialize};

use crate::core::{LheError, LheResult, META_SYMBOL};

/// How the base value `hop0` is predicted from earlier reconstructed samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorMode {
    /// hop0 = previous reconstructed sample
    ZeroOrderHold,
    /// hop0 = r[i-1] + (r[i-1] - r[i-2]) / 2 from the third sample on
    LinearExtrapolation,
}

/// Quantizer, reconstructor and symbol alphabet settings
///
/// Encoder and decoder must run with the same configuration; the container
/// does not record it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LheConfig {
    /// size of the hop alphabet, odd, center is the null hop
    pub num_levels: usize,
    /// ratio = (range_factor * distance / step)^(1 / exponent)
    pub exponent: f64,
    pub range_factor: f64,
    /// upper bound on the ratio between consecutive hop offsets
    pub max_ratio: f64,
    pub step_max: i32,
    pub step_min: i32,
    /// step shrink applied after two consecutive small hops
    pub step_decrement: i32,
    /// hops within this distance of the center count as small
    pub shrink_band: usize,
    pub predictor: PredictorMode,
    /// symbol byte for each hop level, cheapest symbol at the center
    pub priority_table: Vec<u8>,
}

impl LheConfig {
    /// 9-level alphabet with the tuned step schedule
    pub fn basic() -> Self {
        Self::with_levels(9)
    }

    /// 13-level alphabet, same step schedule
    pub fn extended() -> Self {
        Self::with_levels(13)
    }

    /// Default settings for an alphabet of `num_levels` hops
    pub fn with_levels(num_levels: usize) -> Self {
        LheConfig {
            num_levels,
            exponent: 3.0,
            range_factor: 1.0,
            max_ratio: 2.5,
            step_max: 1024,
            step_min: 128,
            step_decrement: 128,
            shrink_band: 1,
            predictor: PredictorMode::ZeroOrderHold,
            priority_table: default_priority_table(num_levels),
        }
    }

    pub fn with_predictor(mut self, predictor: PredictorMode) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn with_step_schedule(mut self, step_min: i32, step_max: i32, decrement: i32) -> Self {
        self.step_min = step_min;
        self.step_max = step_max;
        self.step_decrement = decrement;
        self
    }

    pub fn with_max_ratio(mut self, max_ratio: f64) -> Self {
        self.max_ratio = max_ratio;
        self
    }

    /// index of the null hop
    pub fn center(&self) -> usize {
        self.num_levels / 2
    }

    /// number of levels on each side of the center
    pub fn max_distance(&self) -> usize {
        self.num_levels / 2
    }

    /// step size at the start of every pass
    pub fn initial_step(&self) -> i32 {
        (self.step_max + self.step_min) / 2
    }

    /// Reject settings the transforms cannot run with
    pub fn validate(&self) -> LheResult<()> {
        if self.num_levels < 3 {
            return Err(LheError::config(format!(
                "num_levels must be at least 3, got {}",
                self.num_levels
            )));
        }
        if self.num_levels % 2 == 0 {
            return Err(LheError::config(format!(
                "num_levels must be odd so the null hop is centered, got {}",
                self.num_levels
            )));
        }
        if self.step_min <= 0 {
            return Err(LheError::config(format!(
                "step_min must be positive, got {}",
                self.step_min
            )));
        }
        if self.step_max < self.step_min {
            return Err(LheError::config(format!(
                "step_max ({}) is below step_min ({})",
                self.step_max, self.step_min
            )));
        }
        if self.step_decrement < 0 {
            return Err(LheError::config("step_decrement must not be negative"));
        }
        if !(self.exponent.is_finite() && self.exponent > 0.0) {
            return Err(LheError::config("exponent must be a positive number"));
        }
        if !(self.range_factor.is_finite() && self.range_factor > 0.0) {
            return Err(LheError::config("range_factor must be a positive number"));
        }
        if !(self.max_ratio.is_finite() && self.max_ratio >= 1.0) {
            return Err(LheError::config("max_ratio must be at least 1.0"));
        }
        self.validate_priority_table()
    }

    fn validate_priority_table(&self) -> LheResult<()> {
        let table = &self.priority_table;
        if table.len() != self.num_levels {
            return Err(LheError::config(format!(
                "priority table has {} entries for {} levels",
                table.len(),
                self.num_levels
            )));
        }
        let mut seen = [false; 256];
        for &symbol in table {
            if symbol == META_SYMBOL {
                return Err(LheError::config(
                    "priority table must not use the meta-symbol",
                ));
            }
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(LheError::config(format!(
                    "symbol {:#04x} appears twice in the priority table",
                    symbol
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> LheResult<Self> {
        let config: LheConfig = serde_json::from_str(json)
            .map_err(|e| LheError::config(format!("unreadable configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for LheConfig {
    fn default() -> Self {
        Self::basic()
    }
}

/// Symbols ranked by expected frequency: center first, then +1, -1, +2, -2...
///
/// Rank r maps to '1'..'9' and continues with 'A', 'B', ... past nine.
pub fn default_priority_table(num_levels: usize) -> Vec<u8> {
    let center = num_levels / 2;
    (0..num_levels)
        .map(|level| {
            let rank = if level == center {
                1
            } else if level > center {
                2 * (level - center)
            } else {
                2 * (center - level) + 1
            };
            rank_symbol(rank)
        })
        .collect()
}

fn rank_symbol(rank: usize) -> u8 {
    if rank <= 9 {
        b'0' + rank as u8
    } else {
        // oversized alphabets wrap and are rejected by validate()
        b'A'.wrapping_add((rank - 10) as u8)
    }
}
