#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn to_js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

#[cfg(target_arch = "wasm32")]
fn options_for(levels: u8) -> Result<crate::CodecOptions, JsValue> {
    crate::CodecOptions::with_levels(levels as usize).map_err(to_js_err)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn encode_wav_to_lhe(wav_bytes: &[u8], levels: u8) -> Result<Vec<u8>, JsValue> {
    crate::encode_from_wav(wav_bytes, &options_for(levels)?).map_err(to_js_err)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn decode_lhe_to_wav(lhe_bytes: &[u8], levels: u8) -> Result<Vec<u8>, JsValue> {
    crate::decode_to_wav(lhe_bytes, &options_for(levels)?).map_err(to_js_err)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn decode_lhe_to_samples(lhe_bytes: &[u8], levels: u8) -> Result<JsValue, JsValue> {
    let decoded = crate::decode_to_samples(lhe_bytes, &options_for(levels)?).map_err(to_js_err)?;

    let obj = js_sys::Object::new();
    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("samples"),
        &js_sys::Int16Array::from(&decoded.samples[..]).into(),
    )?;
    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("sampleRate"),
        &JsValue::from_f64(liblhe_audio::core::OUTPUT_SAMPLE_RATE as f64),
    )?;
    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("channels"),
        &JsValue::from_f64(decoded.channels as f64),
    )?;
    Ok(obj.into())
}

/// Encode and decode a WAV file; returns the decoded WAV and PSNR in dB
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn roundtrip_wav(wav_bytes: &[u8], levels: u8) -> Result<JsValue, JsValue> {
    let audio = crate::audio::read_wav_from_bytes(wav_bytes).map_err(to_js_err)?;
    let result = crate::roundtrip(&audio, &options_for(levels)?).map_err(to_js_err)?;

    let obj = js_sys::Object::new();
    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("wav"),
        &js_sys::Uint8Array::from(&result.wav[..]).into(),
    )?;
    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("lheSize"),
        &JsValue::from_f64(result.lhe.len() as f64),
    )?;
    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("psnr"),
        &JsValue::from_f64(result.psnr.as_db()),
    )?;
    Ok(obj.into())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn get_lhe_info_json(lhe_bytes: &[u8]) -> Result<String, JsValue> {
    let info = crate::get_lhe_info(lhe_bytes).map_err(to_js_err)?;
    serde_json::to_string(&info).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn validate_lhe_file(lhe_bytes: &[u8]) -> bool {
    crate::validate_lhe(lhe_bytes)
}

// Initialize wasm-bindgen panic hook for better error messages
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
