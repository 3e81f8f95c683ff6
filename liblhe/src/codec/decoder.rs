use tracing::debug;

use super::{interleave, map_channels};
use crate::core::{HeaderLayout, LheFile, LheResult};
use crate::quantizer::{LheConfig, Reconstructor, SampleBounds};
use crate::symbols::SymbolCodec;
use crate::Reader;

/// decoded samples, interleaved
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub channels: usize,
    /// samples per channel
    pub sample_count: usize,
}

/// audio decoder for lhe format
pub struct Decoder {
    config: LheConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            config: LheConfig::default(),
        }
    }

    /// must match the configuration the file was encoded with
    pub fn with_config(mut self, config: LheConfig) -> Self {
        self.config = config;
        self
    }

    /// decode lhe file to samples
    pub fn decode(&self, data: &[u8]) -> LheResult<DecodedAudio> {
        let file = Reader::new().read(data)?;
        self.decode_file(&file)
    }

    /// decode a file whose layout is known up front
    pub fn decode_with_layout(&self, data: &[u8], layout: HeaderLayout) -> LheResult<DecodedAudio> {
        let file = Reader::new().read_with_layout(data, layout)?;
        self.decode_file(&file)
    }

    /// decode from parsed file
    pub fn decode_file(&self, file: &LheFile) -> LheResult<DecodedAudio> {
        let reconstructor = Reconstructor::new(self.config.clone())?;
        let symbol_codec = SymbolCodec::new(&self.config)?;

        let header = &file.header;
        let sample_count = header.sample_count as usize;
        let bounds = SampleBounds::new(header.min_sample, header.max_sample);

        let inputs: Vec<(&Vec<u8>, i32)> = file
            .symbols
            .iter()
            .zip(&header.channels)
            .map(|(symbols, ch)| (symbols, ch.first_amplitude))
            .collect();

        let channels = map_channels(&inputs, |&(symbols, first_amplitude)| {
            let hops = symbol_codec.decode_with_limit(symbols, sample_count)?;
            reconstructor.reconstruct(&hops, first_amplitude, sample_count, bounds)
        });
        let channels: Vec<Vec<i16>> = channels.into_iter().collect::<LheResult<_>>()?;

        debug!(
            channels = channels.len(),
            samples = sample_count,
            "decoded lhe file"
        );

        Ok(DecodedAudio {
            samples: interleave(&channels),
            channels: channels.len(),
            sample_count,
        })
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
