use tracing::debug;

use super::config::LheConfig;
use super::predictor::{HopLadder, HopLevel, Predictor, SampleBounds};
use crate::core::{ErrorStats, LheResult};

/// Output of one quantizer pass
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedChannel {
    /// one hop level per sample
    pub hops: Vec<HopLevel>,
    /// what the decoder will reproduce from `hops`
    pub reconstructed: Vec<i16>,
}

/// predictive hop quantizer
pub struct Quantizer {
    config: LheConfig,
}

impl Quantizer {
    /// Validates the configuration up front; nothing is quantized with a bad one
    pub fn new(config: LheConfig) -> LheResult<Self> {
        config.validate()?;
        Ok(Quantizer { config })
    }

    pub fn config(&self) -> &LheConfig {
        &self.config
    }

    /// Quantize one channel of samples
    ///
    /// `bounds` must cover every sample; stereo files pass the bounds of both
    /// channels so the header's single min/max applies to each.
    pub fn quantize(&self, samples: &[i16], bounds: SampleBounds) -> QuantizedChannel {
        let mut predictor = Predictor::new(&self.config, bounds);
        let mut hops = Vec::with_capacity(samples.len());
        let mut reconstructed = Vec::with_capacity(samples.len());

        for &sample in samples {
            let ladder = predictor.ladder(sample as i32);
            let (hop, value) = self.select_hop(&ladder, sample as i32);

            predictor.commit(hop, value);
            hops.push(hop);
            reconstructed.push(value as i16);
        }

        let stats = ErrorStats::compute(&reconstructed, samples);
        debug!(
            samples = samples.len(),
            bias = stats.bias,
            mean_abs_error = stats.mean_abs,
            "quantized channel"
        );

        QuantizedChannel {
            hops,
            reconstructed,
        }
    }

    /// Pick the hop whose candidate is closest to `target`
    ///
    /// Scans outward from the null hop in the direction of the target and
    /// stops once the error grows; candidates never decrease with distance,
    /// so this is the exact minimum. Truncated or clamped offsets can repeat
    /// a value, hence equal errors keep scanning; a repeated value never
    /// replaces the inner hop. Two distinct values at the same distance from
    /// the target keep the inner hop, except at the outermost level of
    /// extended alphabets.
    fn select_hop(&self, ladder: &HopLadder, target: i32) -> (HopLevel, i32) {
        let sign = if target as i64 >= ladder.base() { 1 } else { -1 };
        let max_distance = self.config.max_distance() as i32;
        let outer_wins_ties = self.prefers_outer_on_edge_tie();

        let mut best_d = 0i32;
        let mut best_value = ladder.value_at(0);
        let mut best_err = (target - best_value).abs();

        for k in 1..=max_distance {
            let d = sign * k;
            let value = ladder.value_at(d);
            let err = (target - value).abs();

            if err < best_err {
                best_d = d;
                best_value = value;
                best_err = err;
            } else if err > best_err {
                break;
            } else if k == max_distance && outer_wins_ties && value != best_value {
                best_d = d;
                best_value = value;
            }
        }

        let hop = (self.config.center() as i32 + best_d) as HopLevel;
        (hop, best_value)
    }

    /// The 13+ level alphabets resolve a tie at the outermost level in favor
    /// of the outer hop; the basic 9-level alphabet keeps the inner one.
    fn prefers_outer_on_edge_tie(&self) -> bool {
        self.config.num_levels > 9
    }
}
