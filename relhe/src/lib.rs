//! relhe - WAV converter library for lhe
//!
//! This library converts 16-bit WAV audio to and from the lhe lossy format.
//! It works on native targets and can be compiled to WebAssembly.
//!
//! The lhe container does not record the quantizer configuration, so the
//! same `CodecOptions` must be used to encode and decode a file.

pub mod audio;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm;

use anyhow::{Context, Result};
use std::path::Path;

pub use audio::PcmAudio;
pub use liblhe_audio::{DecodedAudio, EncodeReport, LheConfig, PredictorMode, Psnr};

use liblhe_audio::core::OUTPUT_SAMPLE_RATE;

/// Information about an lhe file
#[derive(Debug, Clone, serde::Serialize)]
pub struct LheInfo {
    pub channels: usize,
    /// samples per channel
    pub sample_count: u32,
    pub min_sample: i32,
    pub max_sample: i32,
    /// run-compressed symbols per channel
    pub symbols: Vec<u32>,
    pub header_size: usize,
    pub payload_size: usize,
    pub file_size: usize,
    /// 16-bit PCM size over file size
    pub compression_ratio: f64,
    /// duration at the output rate
    pub duration_secs: f64,
}

/// Get information about an lhe file
pub fn get_lhe_info(data: &[u8]) -> Result<LheInfo> {
    let file = liblhe_audio::Reader::new()
        .read(data)
        .context("Failed to read lhe file")?;
    let header = &file.header;

    let original_size = header.sample_count as usize * header.channel_count() * 2;
    let compression_ratio = if !data.is_empty() {
        (original_size as f64) / (data.len() as f64)
    } else {
        0.0
    };

    Ok(LheInfo {
        channels: header.channel_count(),
        sample_count: header.sample_count as u32,
        min_sample: header.min_sample,
        max_sample: header.max_sample,
        symbols: header
            .channels
            .iter()
            .map(|ch| ch.symbol_count as u32)
            .collect(),
        header_size: header.size(),
        payload_size: file.payload_size,
        file_size: data.len(),
        compression_ratio,
        duration_secs: header.sample_count as f64 / OUTPUT_SAMPLE_RATE as f64,
    })
}

/// Validate an lhe file
pub fn validate_lhe(data: &[u8]) -> bool {
    liblhe_audio::Reader::new().read(data).is_ok()
}

/// Quantizer settings shared by encoding and decoding
#[derive(Debug, Clone, Default)]
pub struct CodecOptions {
    pub config: LheConfig,
}

impl CodecOptions {
    /// 9-level alphabet
    pub fn basic() -> Self {
        Self {
            config: LheConfig::basic(),
        }
    }

    /// 13-level alphabet
    pub fn extended() -> Self {
        Self {
            config: LheConfig::extended(),
        }
    }

    /// preset for an alphabet size (9 or 13)
    pub fn with_levels(num_levels: usize) -> Result<Self> {
        let config = LheConfig::with_levels(num_levels);
        config
            .validate()
            .with_context(|| format!("No preset for {} hop levels", num_levels))?;
        Ok(Self { config })
    }

    /// Load a configuration written by `LheConfig::to_json`
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config = LheConfig::from_json(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Self { config })
    }

    pub fn with_predictor(mut self, predictor: PredictorMode) -> Self {
        self.config = self.config.with_predictor(predictor);
        self
    }
}

/// Encode WAV file bytes to lhe format
///
/// # Arguments
/// * `wav_bytes` - Raw bytes of a mono or stereo WAV file
/// * `options` - Quantizer settings
///
/// # Returns
/// Raw bytes of the lhe file
pub fn encode_from_wav(wav_bytes: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let audio = audio::read_wav_from_bytes(wav_bytes).context("Failed to read WAV file")?;
    let (lhe_data, _) = encode_from_samples(&audio, options)?;
    Ok(lhe_data)
}

/// Encode 16-bit samples to lhe format
///
/// # Returns
/// Raw bytes of the lhe file and the encoder's fidelity report
pub fn encode_from_samples(
    audio: &PcmAudio,
    options: &CodecOptions,
) -> Result<(Vec<u8>, EncodeReport)> {
    let encoder = liblhe_audio::Encoder::new(audio.channels as u8).with_config(options.config.clone());
    encoder
        .encode_with_report(&audio.samples)
        .context("Encoding failed")
}

/// Decode lhe file to raw samples
pub fn decode_to_samples(lhe_bytes: &[u8], options: &CodecOptions) -> Result<DecodedAudio> {
    liblhe_audio::Decoder::new()
        .with_config(options.config.clone())
        .decode(lhe_bytes)
        .context("Invalid lhe file")
}

/// Decode lhe file to WAV format
///
/// # Returns
/// Raw bytes of a 16-bit WAV file at the output rate
pub fn decode_to_wav(lhe_bytes: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let decoded = decode_to_samples(lhe_bytes, options)?;
    audio::write_wav_to_bytes(&decoded.samples, decoded.channels)
        .context("Failed to write WAV data")
}

/// Result of encoding and immediately decoding one file
#[derive(Debug, Clone)]
pub struct RoundTrip {
    /// the intermediate lhe file
    pub lhe: Vec<u8>,
    /// decoded audio as WAV bytes
    pub wav: Vec<u8>,
    /// PSNR of the decoded file against the source
    pub psnr: Psnr,
    pub report: EncodeReport,
}

/// Encode then decode, reporting fidelity of the decoded file
pub fn roundtrip(audio: &PcmAudio, options: &CodecOptions) -> Result<RoundTrip> {
    let (lhe_data, report) = encode_from_samples(audio, options)?;
    let decoded = decode_to_samples(&lhe_data, options)?;
    let psnr = liblhe_audio::compute_psnr(&decoded.samples, &audio.samples, audio.samples.len());
    let wav = audio::write_wav_to_bytes(&decoded.samples, decoded.channels)
        .context("Failed to write WAV data")?;

    Ok(RoundTrip {
        lhe: lhe_data,
        wav,
        psnr,
        report,
    })
}
