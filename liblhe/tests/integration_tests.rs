//! High-level tests that verify the full encode/decode pipeline works correctly.

use liblhe_audio::{
    decode, default_config, encode, info, psnr, validate, version, Decoder, Encoder, HeaderLayout,
    LheConfig, LheError, PredictorMode, Psnr, MONO_HEADER_SIZE, STEREO_HEADER_SIZE,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tone(len: usize, amplitude: f32, period: f32) -> Vec<i16> {
    (0..len)
        .map(|i| ((i as f32 * 2.0 * std::f32::consts::PI / period).sin() * amplitude) as i16)
        .collect()
}

fn stereo(left: &[i16], right: &[i16]) -> Vec<i16> {
    left.iter()
        .zip(right)
        .flat_map(|(&l, &r)| [l, r])
        .collect()
}

// ============================================================================
// Version Tests
// ============================================================================

#[test]
fn test_version() {
    assert_eq!(version(), env!("CARGO_PKG_VERSION"));
}

// ============================================================================
// Mono Tests
// ============================================================================

#[test]
fn test_mono_round_trip() {
    init_logging();
    let samples = tone(48000, 12000.0, 120.0);
    let (bytes, report) = Encoder::new(1).encode_with_report(&samples).unwrap();

    let decoded = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.sample_count, samples.len());
    assert_eq!(decoded.samples, report.reconstructed);
    assert_eq!(report.file_size, bytes.len());
    assert!(report.psnr.as_db() > 30.0);
}

#[test]
fn test_mono_compresses() {
    let samples = tone(48000, 6000.0, 240.0);
    let bytes = Encoder::new(1).encode(&samples).unwrap();

    // well under the 16 bits per sample of PCM
    assert!(bytes.len() < samples.len() * 2 / 3);
}

#[test]
fn test_all_zero_file() {
    let samples = [0i16; 5];
    let bytes = Encoder::new(1).encode(&samples).unwrap();

    let decoded = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded.samples, vec![0; 5]);
}

#[test]
fn test_empty_file() {
    let bytes = Encoder::new(1).encode(&[]).unwrap();
    assert_eq!(bytes.len(), MONO_HEADER_SIZE + 6);

    let decoded = Decoder::new().decode(&bytes).unwrap();
    assert!(decoded.samples.is_empty());
    assert_eq!(decoded.sample_count, 0);
}

#[test]
fn test_single_sample() {
    let bytes = Encoder::new(1).encode(&[1234]).unwrap();
    let decoded = Decoder::new().decode(&bytes).unwrap();

    assert_eq!(decoded.samples, vec![1234]);
}

#[test]
fn test_silence_compresses_to_meta_symbols() {
    let mut samples = vec![0i16; 48000];
    samples[0] = 100;
    samples[1] = -100;
    let bytes = Encoder::new(1).encode(&samples).unwrap();

    assert!(bytes.len() < 200, "{} bytes for a second of silence", bytes.len());
}

// ============================================================================
// Stereo Tests
// ============================================================================

#[test]
fn test_stereo_round_trip() {
    init_logging();
    let left = tone(24000, 9000.0, 100.0);
    let right = tone(24000, 4000.0, 33.0);
    let samples = stereo(&left, &right);

    let (bytes, report) = Encoder::new(2).encode_with_report(&samples).unwrap();
    assert_eq!(report.channels.len(), 2);

    let decoded = Decoder::new()
        .decode_with_layout(&bytes, HeaderLayout::Stereo)
        .unwrap();
    assert_eq!(decoded.channels, 2);
    assert_eq!(decoded.sample_count, 24000);
    assert_eq!(decoded.samples, report.reconstructed);
}

#[test]
fn test_identical_channels_match_mono() {
    // mono shares the bounds here because both channels are the same signal
    let mono = tone(5000, 15000.0, 77.0);
    let both = stereo(&mono, &mono);

    let mono_decoded = Decoder::new()
        .decode(&Encoder::new(1).encode(&mono).unwrap())
        .unwrap();
    let stereo_decoded = Decoder::new()
        .decode(&Encoder::new(2).encode(&both).unwrap())
        .unwrap();

    assert_eq!(stereo_decoded.samples, stereo(&mono_decoded.samples, &mono_decoded.samples));
}

#[test]
fn test_stereo_header_size() {
    let samples = stereo(&[1, 2, 3], &[4, 5, 6]);
    let bytes = Encoder::new(2).encode(&samples).unwrap();
    let file_info = info(&bytes).unwrap();

    assert_eq!(file_info.channels, 2);
    assert_eq!(file_info.header_size, STEREO_HEADER_SIZE);
    assert_eq!(file_info.sample_count, 3);
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_extended_alphabet_round_trip() {
    let samples = tone(20000, 25000.0, 15.0);
    let config = LheConfig::extended();

    let (bytes, report) = Encoder::new(1)
        .with_config(config.clone())
        .encode_with_report(&samples)
        .unwrap();
    let decoded = Decoder::new().with_config(config).decode(&bytes).unwrap();

    assert_eq!(decoded.samples, report.reconstructed);
}

#[test]
fn test_linear_predictor_round_trip() {
    let samples = tone(10000, 20000.0, 400.0);
    let config = LheConfig::basic().with_predictor(PredictorMode::LinearExtrapolation);

    let (bytes, report) = Encoder::new(1)
        .with_config(config.clone())
        .encode_with_report(&samples)
        .unwrap();
    let decoded = Decoder::new().with_config(config).decode(&bytes).unwrap();

    assert_eq!(decoded.samples, report.reconstructed);
}

#[test]
fn test_encoding_is_deterministic() {
    let samples = stereo(&tone(3000, 8000.0, 50.0), &tone(3000, 3000.0, 20.0));

    let first = Encoder::new(2).encode(&samples).unwrap();
    let second = Encoder::new(2).encode(&samples).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_config_rejected() {
    let encoder = Encoder::new(1).with_config(LheConfig::with_levels(8));
    assert!(matches!(encoder.encode(&[1, 2, 3]), Err(LheError::Config(_))));
}

// ============================================================================
// Input Validation Tests
// ============================================================================

#[test]
fn test_three_channels_rejected() {
    let result = Encoder::new(3).encode(&[0; 9]);
    assert!(matches!(result, Err(LheError::Config(_))));
}

#[test]
fn test_odd_interleave_rejected() {
    let result = Encoder::new(2).encode(&[0; 7]);
    assert!(matches!(result, Err(LheError::Config(_))));
}

#[test]
fn test_corrupt_files_do_not_panic() {
    let samples = tone(2000, 10000.0, 60.0);
    let bytes = Encoder::new(1).encode(&samples).unwrap();

    let mut state = 0x2545_f491u32;
    for _ in 0..200 {
        let mut corrupt = bytes.clone();
        for _ in 0..3 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let pos = state as usize % corrupt.len();
            corrupt[pos] ^= (state >> 24) as u8 | 1;
        }
        // any outcome is fine as long as it returns
        let _ = Decoder::new().decode(&corrupt);
    }

    for len in 0..bytes.len() {
        assert!(Decoder::new().decode(&bytes[..len]).is_err());
    }
}

// ============================================================================
// Facade Tests
// ============================================================================

#[test]
fn test_facade_round_trip() {
    let samples = tone(4800, 9000.0, 48.0);
    let bytes = encode(&samples, 1).unwrap();

    assert!(validate(&bytes));
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.len(), samples.len());
    assert!(psnr(&decoded, &samples) > 30.0);
}

#[test]
fn test_facade_validate_rejects_garbage() {
    assert!(!validate(&[]));
    assert!(!validate(&[0xff; 40]));
}

#[test]
fn test_facade_info() {
    let samples = tone(4800, 9000.0, 48.0);
    let bytes = encode(&samples, 1).unwrap();
    let file_info = info(&bytes).unwrap();

    assert_eq!(file_info.channels, 1);
    assert_eq!(file_info.sample_count, 4800);
    assert_eq!(file_info.header_size, MONO_HEADER_SIZE);
    assert_eq!(file_info.file_size, bytes.len());
    assert_eq!(file_info.payload_size, bytes.len() - MONO_HEADER_SIZE);
    assert_eq!(file_info.right_symbols, 0);
    assert!(file_info.compression_ratio > 1.0);
    assert_eq!(file_info.max_sample, *samples.iter().max().unwrap() as i32);
    assert_eq!(file_info.min_sample, *samples.iter().min().unwrap() as i32);
}

#[test]
fn test_facade_psnr_perfect() {
    assert!(psnr(&[1, 2, 3], &[1, 2, 3]).is_infinite());
    assert_eq!(Psnr::Perfect.as_db(), f64::INFINITY);
}

#[test]
fn test_facade_default_config() {
    let json = default_config(9).unwrap();
    assert_eq!(LheConfig::from_json(&json).unwrap(), LheConfig::basic());
}
