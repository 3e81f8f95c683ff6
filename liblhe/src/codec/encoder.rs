use serde::Serialize;
use tracing::debug;

use super::{deinterleave, interleave, map_channels};
use crate::core::{
    compute_psnr, ChannelHeader, ErrorStats, Header, HeaderLayout, LheError, LheResult, Psnr,
    TAG_BASIC,
};
use crate::quantizer::{LheConfig, QuantizedChannel, Quantizer, SampleBounds};
use crate::symbols::SymbolCodec;
use crate::Writer;

/// Per-channel outcome of an encode pass
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub samples: usize,
    pub symbols: usize,
    pub psnr: Psnr,
    pub error: ErrorStats,
}

/// What an encode pass produced besides the file bytes
#[derive(Debug, Clone, Serialize)]
pub struct EncodeReport {
    pub channels: Vec<ChannelReport>,
    /// PSNR over all channels
    pub psnr: Psnr,
    pub file_size: usize,
    /// the decoder's output, interleaved
    #[serde(skip)]
    pub reconstructed: Vec<i16>,
}

pub struct Encoder {
    channels: u8,
    config: LheConfig,
}

impl Encoder {
    pub fn new(channels: u8) -> Self {
        Encoder {
            channels,
            config: LheConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LheConfig {
        &self.config
    }

    /// encode 16-bit samples (mono or interleaved stereo) to lhe format
    pub fn encode(&self, samples: &[i16]) -> LheResult<Vec<u8>> {
        self.encode_with_report(samples).map(|(bytes, _)| bytes)
    }

    /// encode and report per-channel fidelity
    pub fn encode_with_report(&self, samples: &[i16]) -> LheResult<(Vec<u8>, EncodeReport)> {
        let channels = self.channels as usize;
        if HeaderLayout::from_channels(channels).is_none() {
            return Err(LheError::config(format!(
                "only mono and stereo are supported, got {} channels",
                channels
            )));
        }
        if samples.len() % channels != 0 {
            return Err(LheError::config(format!(
                "{} interleaved samples do not split into {} channels",
                samples.len(),
                channels
            )));
        }
        let sample_count = i32::try_from(samples.len() / channels)
            .map_err(|_| LheError::container("too many samples for the header"))?;

        let quantizer = Quantizer::new(self.config.clone())?;
        let symbol_codec = SymbolCodec::new(&self.config)?;

        // one min/max for the whole file
        let bounds = SampleBounds::from_samples(samples);
        let channel_samples = deinterleave(samples, channels);

        let encoded = map_channels(&channel_samples, |ch_samples| {
            let quantized = quantizer.quantize(ch_samples, bounds);
            symbol_codec
                .encode(&quantized.hops)
                .map(|symbols| (quantized, symbols))
        });
        let encoded: Vec<(QuantizedChannel, Vec<u8>)> =
            encoded.into_iter().collect::<LheResult<_>>()?;

        let header = Header {
            tag: TAG_BASIC,
            channels: channel_samples
                .iter()
                .zip(&encoded)
                .map(|(ch_samples, (_, symbols))| ChannelHeader {
                    symbol_count: symbols.len() as i32,
                    first_amplitude: ch_samples.first().copied().unwrap_or(0) as i32,
                })
                .collect(),
            sample_count,
            max_sample: bounds.max,
            min_sample: bounds.min,
        };

        let symbols: Vec<Vec<u8>> = encoded.iter().map(|(_, s)| s.clone()).collect();
        let bytes = Writer::new().write(&header, &symbols)?;

        let channel_reports = channel_samples
            .iter()
            .zip(&encoded)
            .map(|(original, (quantized, symbols))| ChannelReport {
                samples: original.len(),
                symbols: symbols.len(),
                psnr: compute_psnr(&quantized.reconstructed, original, original.len()),
                error: ErrorStats::compute(&quantized.reconstructed, original),
            })
            .collect();

        let reconstructed = interleave(
            &encoded
                .into_iter()
                .map(|(q, _)| q.reconstructed)
                .collect::<Vec<_>>(),
        );
        let psnr = compute_psnr(&reconstructed, samples, samples.len());

        debug!(
            channels,
            samples = sample_count,
            bytes = bytes.len(),
            %psnr,
            "encoded lhe file"
        );

        let report = EncodeReport {
            channels: channel_reports,
            psnr,
            file_size: bytes.len(),
            reconstructed,
        };
        Ok((bytes, report))
    }
}
