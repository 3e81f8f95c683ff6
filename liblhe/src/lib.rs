use wasm_bindgen::prelude::*;

pub mod codec;
pub mod core;
pub mod quantizer;
pub mod symbols;

mod reader;
mod writer;

pub use codec::{ChannelReport, DecodedAudio, Decoder, EncodeReport, Encoder};
pub use crate::core::{
    compute_psnr, huffman, ChannelHeader, ErrorStats, Header, HeaderLayout, LheError, LheFile,
    LheResult, Psnr, META_SYMBOL, MONO_HEADER_SIZE, STEREO_HEADER_SIZE, TAG_BASIC,
};
pub use quantizer::{LheConfig, PredictorMode, SampleBounds};
pub use reader::Reader;
pub use symbols::{PriorityTable, SymbolCodec};
pub use writer::Writer;

// audio info for the info() function

/// info about an lhe file
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// 1 or 2
    pub channels: u8,
    /// Samples per channel
    pub sample_count: u32,
    /// Smallest sample of the source, shared by all channels
    pub min_sample: i32,
    /// Largest sample of the source, shared by all channels
    pub max_sample: i32,
    /// Symbols in the first channel's stream
    pub left_symbols: u32,
    /// Symbols in the second channel's stream, 0 for mono
    pub right_symbols: u32,
    /// Header size in bytes
    pub header_size: usize,
    /// Entropy-coded payload size in bytes
    pub payload_size: usize,
    /// File size in bytes
    pub file_size: usize,
    /// Compression ratio (16-bit PCM / compressed)
    pub compression_ratio: f64,
}

// result helpers

/// turn an error into js
fn to_js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_config(config_json: &str) -> Result<LheConfig, JsValue> {
    LheConfig::from_json(config_json).map_err(to_js_err)
}

// api functions

/// encode samples to lhe with the 9-level alphabet
///
/// # Arguments
/// * `samples` - Interleaved 16-bit samples
/// * `channels` - Number of channels (1 or 2)
///
/// # Returns
/// lhe file as byte array
///
/// # Note
/// For custom hop alphabets or step schedules use `encode_with_config`,
/// or the `Encoder` builder directly.
#[wasm_bindgen]
pub fn encode(samples: &[i16], channels: u8) -> Result<Vec<u8>, JsValue> {
    Encoder::new(channels).encode(samples).map_err(to_js_err)
}

/// encode samples to lhe with a JSON configuration
///
/// # Arguments
/// * `samples` - Interleaved 16-bit samples
/// * `channels` - Number of channels (1 or 2)
/// * `config_json` - `LheConfig` as JSON, see `default_config`
#[wasm_bindgen]
pub fn encode_with_config(
    samples: &[i16],
    channels: u8,
    config_json: &str,
) -> Result<Vec<u8>, JsValue> {
    Encoder::new(channels)
        .with_config(parse_config(config_json)?)
        .encode(samples)
        .map_err(to_js_err)
}

/// decode lhe file to interleaved samples
///
/// Files encoded with a non-default configuration need
/// `decode_with_config`; the container does not record it.
#[wasm_bindgen]
pub fn decode(data: &[u8]) -> Result<Vec<i16>, JsValue> {
    Decoder::new()
        .decode(data)
        .map(|audio| audio.samples)
        .map_err(to_js_err)
}

/// decode lhe file with the configuration it was encoded with
#[wasm_bindgen]
pub fn decode_with_config(data: &[u8], config_json: &str) -> Result<Vec<i16>, JsValue> {
    Decoder::new()
        .with_config(parse_config(config_json)?)
        .decode(data)
        .map(|audio| audio.samples)
        .map_err(to_js_err)
}

/// Check that a file parses: header fields consistent, every channel
/// stream entropy-decodes to the advertised symbol count, no trailing bytes
#[wasm_bindgen]
pub fn validate(data: &[u8]) -> bool {
    Reader::new().read(data).is_ok()
}

/// Get information about an lhe file
///
/// # Arguments
/// * `data` - lhe file bytes
///
/// # Returns
/// AudioInfo struct with file details
#[wasm_bindgen]
pub fn info(data: &[u8]) -> Result<AudioInfo, JsValue> {
    let file = Reader::new().read(data).map_err(to_js_err)?;
    let header = &file.header;

    let symbols_of = |ch: usize| {
        header
            .channels
            .get(ch)
            .map(|c| c.symbol_count as u32)
            .unwrap_or(0)
    };

    let original_size = header.sample_count as usize * header.channel_count() * 2;
    let compression_ratio = if !data.is_empty() {
        original_size as f64 / data.len() as f64
    } else {
        0.0
    };

    Ok(AudioInfo {
        channels: header.channel_count() as u8,
        sample_count: header.sample_count as u32,
        min_sample: header.min_sample,
        max_sample: header.max_sample,
        left_symbols: symbols_of(0),
        right_symbols: symbols_of(1),
        header_size: header.size(),
        payload_size: file.payload_size,
        file_size: data.len(),
        compression_ratio,
    })
}

/// PSNR in dB of a reconstruction, `Infinity` when it is exact
#[wasm_bindgen]
pub fn psnr(reconstructed: &[i16], original: &[i16]) -> f64 {
    compute_psnr(reconstructed, original, original.len()).as_db()
}

/// default configuration as JSON
///
/// # Arguments
/// * `num_levels` - 9 for the basic alphabet, 13 for the extended one
#[wasm_bindgen]
pub fn default_config(num_levels: u8) -> Result<String, JsValue> {
    let config = LheConfig::with_levels(num_levels as usize);
    config.validate().map_err(to_js_err)?;
    config.to_json().map_err(to_js_err)
}

/// get lib version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
