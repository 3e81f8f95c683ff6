//! Shared prediction and step-adaptation state machine
//!
//! The encoder and the decoder both drive a [`Predictor`]: `ladder()` yields
//! the candidate values for the current sample, `commit()` records the chosen
//! hop and adapts the step size. Encoder and decoder fed the same hops and
//! seed walk through identical states, so every reconstructed value the
//! encoder computes is exactly what the decoder will produce.

use super::config::{LheConfig, PredictorMode};

/// Index into the hop alphabet; `config.center()` is the null hop
pub type HopLevel = u8;

/// Amplitude bounds of a file, shared by all its channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBounds {
    pub min: i32,
    pub max: i32,
}

impl SampleBounds {
    pub fn new(min: i32, max: i32) -> Self {
        SampleBounds { min, max }
    }

    /// min/max of the samples, (0, 0) when empty
    pub fn from_samples(samples: &[i16]) -> Self {
        let min = samples.iter().copied().min().unwrap_or(0) as i32;
        let max = samples.iter().copied().max().unwrap_or(0) as i32;
        SampleBounds { min, max }
    }

    /// width of the unsigned coordinate space
    pub fn range(&self) -> i64 {
        self.max as i64 - self.min as i64
    }

    /// Interval candidates are clamped to, in unsigned coordinates
    ///
    /// Normally `[1, range - 1]`; ranges narrower than 2 collapse to `[0, range]`.
    fn clamp_interval(&self) -> (i64, i64) {
        let range = self.range();
        if range >= 2 {
            (1, range - 1)
        } else {
            (0, range)
        }
    }
}

/// Per-pass state; one per channel, never shared
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorState {
    pub last_reconstructed: i32,
    pub second_last_reconstructed: i32,
    pub step_size: i32,
    pub last_was_small: bool,
    /// samples committed so far
    pub position: usize,
}

impl PredictorState {
    pub fn new(config: &LheConfig) -> Self {
        PredictorState {
            last_reconstructed: 0,
            second_last_reconstructed: 0,
            step_size: config.initial_step(),
            last_was_small: false,
            position: 0,
        }
    }
}

/// Candidate reconstructed values for one sample
#[derive(Debug, Clone, Copy)]
pub struct HopLadder {
    /// predicted base value, unsigned coordinates
    hop0: i64,
    step: i64,
    ratio_up: f64,
    ratio_down: f64,
    bounds: SampleBounds,
}

impl HopLadder {
    fn new(hop0_signed: i64, step: i32, bounds: SampleBounds, config: &LheConfig) -> Self {
        let hop0 = hop0_signed - bounds.min as i64;
        let step = step as i64;

        let ratio_up = hop_ratio((bounds.range() - hop0).abs(), step, config);
        let ratio_down = hop_ratio(hop0.abs(), step, config);

        HopLadder {
            hop0,
            step,
            ratio_up,
            ratio_down,
            bounds,
        }
    }

    /// predicted base value in the signed domain
    pub fn base(&self) -> i64 {
        self.hop0 + self.bounds.min as i64
    }

    /// Offset of the level `distance` steps from the center (distance >= 0)
    fn offset(&self, distance: u32, ratio: f64) -> i64 {
        match distance {
            0 => 0,
            1 => self.step,
            _ => {
                let mut amplitude = self.step as f64;
                for _ in 1..distance {
                    amplitude *= ratio;
                }
                amplitude as i64
            }
        }
    }

    /// Reconstructed value of the hop at signed distance `d` from the center
    pub fn value_at(&self, d: i32) -> i32 {
        let value = if d >= 0 {
            self.hop0 + self.offset(d as u32, self.ratio_up)
        } else {
            self.hop0 - self.offset(d.unsigned_abs(), self.ratio_down)
        };

        let (lo, hi) = self.bounds.clamp_interval();
        (value.clamp(lo, hi) + self.bounds.min as i64) as i32
    }
}

/// ratio = min(max_ratio, (range_factor * distance / step)^(1 / exponent)),
/// floored at 1 so offsets never shrink outward
///
/// Without the floor the ratio drops below 1 within `step` of a bound and
/// the outer candidates fold back inward; output differs from encoders
/// that use the bare formula there.
fn hop_ratio(distance: i64, step: i64, config: &LheConfig) -> f64 {
    let base = config.range_factor * distance as f64 / step as f64;
    base.powf(1.0 / config.exponent).clamp(1.0, config.max_ratio)
}

/// Prediction/adaptation engine shared by quantizer and reconstructor
#[derive(Debug, Clone)]
pub struct Predictor<'a> {
    config: &'a LheConfig,
    bounds: SampleBounds,
    state: PredictorState,
}

impl<'a> Predictor<'a> {
    pub fn new(config: &'a LheConfig, bounds: SampleBounds) -> Self {
        Predictor {
            config,
            bounds,
            state: PredictorState::new(config),
        }
    }

    pub fn state(&self) -> &PredictorState {
        &self.state
    }

    /// Predict hop0 for the next sample
    ///
    /// `seed` is only consulted for the first sample: the original sample on
    /// the encoder side, the stored first amplitude on the decoder side.
    pub fn predict(&self, seed: i32) -> i64 {
        let s = &self.state;
        match s.position {
            0 => seed as i64,
            1 => s.last_reconstructed as i64,
            _ => match self.config.predictor {
                PredictorMode::ZeroOrderHold => s.last_reconstructed as i64,
                PredictorMode::LinearExtrapolation => {
                    let last = s.last_reconstructed as i64;
                    let slope = last - s.second_last_reconstructed as i64;
                    last + slope.div_euclid(2)
                }
            },
        }
    }

    /// Candidate ladder for the next sample
    pub fn ladder(&self, seed: i32) -> HopLadder {
        HopLadder::new(self.predict(seed), self.state.step_size, self.bounds, self.config)
    }

    /// Record the hop chosen for the current sample and adapt the step size
    pub fn commit(&mut self, hop: HopLevel, reconstructed: i32) {
        let config = self.config;
        let s = &mut self.state;

        let distance = (hop as usize).abs_diff(config.center());
        let small = distance <= config.shrink_band;

        if small && s.last_was_small {
            s.step_size = (s.step_size - config.step_decrement).max(config.step_min);
        } else {
            s.step_size = config.step_max;
        }

        s.last_was_small = small;
        s.second_last_reconstructed = s.last_reconstructed;
        s.last_reconstructed = reconstructed;
        s.position += 1;
    }
}
