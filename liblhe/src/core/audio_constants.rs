/// Maximum positive value for 16-bit signed integer (2^15 - 1)
pub const I16_MAX_F32: f32 = 32767.0;

/// Minimum value for 16-bit signed integer (-2^15)
pub const I16_MIN_F32: f32 = -32768.0;

/// Peak-to-peak amplitude of 16-bit audio, used as the PSNR peak
pub const FULL_SCALE_AMPLITUDE: f64 = 65535.0;

/// Output rate of decoded WAV files in Hz
///
/// The container does not record the source rate.
pub const OUTPUT_SAMPLE_RATE: u32 = 48_000;

/// Convert f32 sample (-1.0 to 1.0) to i16
#[inline]
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * I16_MAX_F32).clamp(I16_MIN_F32, I16_MAX_F32) as i16
}

/// Scale a signed sample of `bits` width down (or up) to 16 bits
#[inline]
pub fn scale_to_i16(sample: i32, bits: u32) -> i16 {
    match bits {
        0..=16 => (sample << (16 - bits.max(1))) as i16,
        _ => (sample >> (bits - 16)) as i16,
    }
}
