use tracing::debug;

use super::config::LheConfig;
use super::predictor::{HopLevel, Predictor, SampleBounds};
use crate::core::{LheError, LheResult};

/// hop reconstructor, inverse of the quantizer's reconstruction half
pub struct Reconstructor {
    config: LheConfig,
}

impl Reconstructor {
    pub fn new(config: LheConfig) -> LheResult<Self> {
        config.validate()?;
        Ok(Reconstructor { config })
    }

    pub fn config(&self) -> &LheConfig {
        &self.config
    }

    /// Rebuild samples from a hop sequence
    ///
    /// # Arguments
    /// * `hops` - hop levels, one per sample
    /// * `first_amplitude` - seed prediction for the first sample
    /// * `sample_count` - expected number of samples
    /// * `bounds` - min/max stored in the container
    pub fn reconstruct(
        &self,
        hops: &[HopLevel],
        first_amplitude: i32,
        sample_count: usize,
        bounds: SampleBounds,
    ) -> LheResult<Vec<i16>> {
        if hops.len() != sample_count {
            return Err(LheError::container(format!(
                "expected {} hops, stream holds {}",
                sample_count,
                hops.len()
            )));
        }

        let center = self.config.center() as i32;
        let mut predictor = Predictor::new(&self.config, bounds);
        let mut samples = Vec::with_capacity(sample_count);

        for (i, &hop) in hops.iter().enumerate() {
            if hop as usize >= self.config.num_levels {
                return Err(LheError::container(format!(
                    "hop level {} at sample {} is outside a {}-level alphabet",
                    hop, i, self.config.num_levels
                )));
            }

            let value = predictor.ladder(first_amplitude).value_at(hop as i32 - center);
            predictor.commit(hop, value);
            samples.push(value as i16);
        }

        debug!(samples = samples.len(), "reconstructed channel");
        Ok(samples)
    }
}
