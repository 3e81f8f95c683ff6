//! Tests for the hop quantizer and its inverse, the reconstructor.

use liblhe_audio::quantizer::{
    LheConfig, PredictorMode, QuantizedChannel, Quantizer, Reconstructor, SampleBounds,
};
use liblhe_audio::{compute_psnr, LheError, Psnr};

fn sine(len: usize, amplitude: f32, period: f32) -> Vec<i16> {
    (0..len)
        .map(|i| ((i as f32 * 2.0 * std::f32::consts::PI / period).sin() * amplitude) as i16)
        .collect()
}

fn quantize(config: &LheConfig, samples: &[i16]) -> (QuantizedChannel, SampleBounds) {
    let bounds = SampleBounds::from_samples(samples);
    let quantizer = Quantizer::new(config.clone()).unwrap();
    (quantizer.quantize(samples, bounds), bounds)
}

fn reconstruct(config: &LheConfig, q: &QuantizedChannel, seed: i16, bounds: SampleBounds) -> Vec<i16> {
    Reconstructor::new(config.clone())
        .unwrap()
        .reconstruct(&q.hops, seed as i32, q.hops.len(), bounds)
        .unwrap()
}

// ============================================================================
// Round Trip Tests
// ============================================================================

#[test]
fn test_reconstructor_matches_quantizer_basic() {
    let config = LheConfig::basic();
    let samples = sine(4800, 12000.0, 96.0);
    let (q, bounds) = quantize(&config, &samples);

    assert_eq!(q.hops.len(), samples.len());
    assert_eq!(reconstruct(&config, &q, samples[0], bounds), q.reconstructed);
}

#[test]
fn test_reconstructor_matches_quantizer_extended() {
    let config = LheConfig::extended();
    let samples = sine(4800, 30000.0, 37.0);
    let (q, bounds) = quantize(&config, &samples);

    assert_eq!(reconstruct(&config, &q, samples[0], bounds), q.reconstructed);
}

#[test]
fn test_reconstructor_matches_quantizer_linear() {
    let config = LheConfig::basic().with_predictor(PredictorMode::LinearExtrapolation);
    let samples = sine(4800, 8000.0, 200.0);
    let (q, bounds) = quantize(&config, &samples);

    assert_eq!(reconstruct(&config, &q, samples[0], bounds), q.reconstructed);
}

#[test]
fn test_reconstructor_matches_quantizer_noise() {
    // deterministic pseudo-random walk
    let mut state = 12345u32;
    let samples: Vec<i16> = (0..3000)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 16) as i16
        })
        .collect();

    for config in [LheConfig::basic(), LheConfig::extended()] {
        let (q, bounds) = quantize(&config, &samples);
        assert_eq!(reconstruct(&config, &q, samples[0], bounds), q.reconstructed);
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_all_zero_samples() {
    let config = LheConfig::basic();
    let samples = [0i16; 5];
    let (q, bounds) = quantize(&config, &samples);

    let center = config.center() as u8;
    assert!(q.hops.iter().all(|&h| h == center));
    assert_eq!(q.reconstructed, vec![0; 5]);
    assert_eq!(reconstruct(&config, &q, 0, bounds), vec![0; 5]);
}

#[test]
fn test_constant_signal_stays_on_null_hop() {
    let config = LheConfig::basic();
    let mut samples = vec![500i16; 200];
    // keep 500 inside the clamp interval, away from the maximum
    samples.extend([-500, 1000]);
    let (q, _) = quantize(&config, &samples);

    let center = config.center() as u8;
    assert!(q.hops[..200].iter().all(|&h| h == center));
    assert!(q.reconstructed[..200].iter().all(|&s| s == 500));
}

#[test]
fn test_empty_input() {
    let config = LheConfig::basic();
    let (q, bounds) = quantize(&config, &[]);

    assert!(q.hops.is_empty());
    assert!(q.reconstructed.is_empty());
    assert!(reconstruct(&config, &q, 0, bounds).is_empty());
}

#[test]
fn test_single_sample_is_exact() {
    let config = LheConfig::basic();
    let samples = [1234i16, 1000, 1500];
    let (q, _) = quantize(&config, &samples);

    // the first sample seeds its own prediction
    assert_eq!(q.reconstructed[0], 1234);
    assert_eq!(q.hops[0], config.center() as u8);
}

#[test]
fn test_sine_quality() {
    let config = LheConfig::basic();
    let samples = sine(48000, 10000.0, 109.0);
    let (q, _) = quantize(&config, &samples);

    match compute_psnr(&q.reconstructed, &samples, samples.len()) {
        Psnr::Perfect => {}
        Psnr::Decibels(db) => assert!(db > 30.0, "PSNR too low: {}", db),
    }
}

// ============================================================================
// Bounds Tests
// ============================================================================

#[test]
fn test_reconstruction_within_bounds() {
    let config = LheConfig::extended();
    let mut samples = sine(2000, 32000.0, 11.0);
    samples.extend([i16::MAX, i16::MIN, i16::MAX, i16::MIN]);
    let (q, bounds) = quantize(&config, &samples);

    for &r in &q.reconstructed {
        assert!(r as i32 >= bounds.min && r as i32 <= bounds.max);
    }
}

#[test]
fn test_shared_bounds_wider_than_channel() {
    let config = LheConfig::basic();
    let samples = sine(1000, 100.0, 50.0);
    let bounds = SampleBounds::new(-20000, 20000);
    let quantizer = Quantizer::new(config.clone()).unwrap();
    let q = quantizer.quantize(&samples, bounds);

    let rebuilt = Reconstructor::new(config)
        .unwrap()
        .reconstruct(&q.hops, samples[0] as i32, samples.len(), bounds)
        .unwrap();
    assert_eq!(rebuilt, q.reconstructed);
}

// ============================================================================
// Tie-Break Tests
// ============================================================================

/// fixed step of 100 with the ratio pinned at 2: offsets 100, 200, 400, ...
fn doubling_ladder(levels: usize) -> LheConfig {
    LheConfig::with_levels(levels)
        .with_step_schedule(100, 100, 0)
        .with_max_ratio(2.0)
}

#[test]
fn test_clamped_plateau_keeps_smallest_hop() {
    // every hop above the center clamps to 99, so only +1 is worth its symbol
    for config in [LheConfig::basic(), LheConfig::extended()] {
        let quantizer = Quantizer::new(config.clone()).unwrap();
        let q = quantizer.quantize(&[0, 50], SampleBounds::new(-100, 100));

        let center = config.center() as u8;
        assert_eq!(q.hops, vec![center, center + 1], "{} levels", config.num_levels);
        assert_eq!(q.reconstructed, vec![0, 99]);
    }
}

#[test]
fn test_outermost_tie_basic_keeps_inner_hop() {
    // 600 sits halfway between offsets 400 (+3) and 800 (+4)
    let quantizer = Quantizer::new(doubling_ladder(9)).unwrap();
    let q = quantizer.quantize(&[0, 600], SampleBounds::new(-32768, 32767));

    assert_eq!(q.hops, vec![4, 7]);
    assert_eq!(q.reconstructed, vec![0, 400]);
}

#[test]
fn test_outermost_tie_extended_takes_outer_hop() {
    // 2400 sits halfway between offsets 1600 (+5) and 3200 (+6)
    let quantizer = Quantizer::new(doubling_ladder(13)).unwrap();
    let q = quantizer.quantize(&[0, 2400], SampleBounds::new(-32768, 32767));

    assert_eq!(q.hops, vec![6, 12]);
    assert_eq!(q.reconstructed, vec![0, 3200]);
}

#[test]
fn test_inner_tie_extended_keeps_inner_hop() {
    let quantizer = Quantizer::new(doubling_ladder(13)).unwrap();
    let q = quantizer.quantize(&[0, 600], SampleBounds::new(-32768, 32767));

    assert_eq!(q.hops, vec![6, 9]);
    assert_eq!(q.reconstructed, vec![0, 400]);
}

#[test]
fn test_outermost_tie_below_prediction() {
    let quantizer = Quantizer::new(doubling_ladder(13)).unwrap();
    let q = quantizer.quantize(&[0, -2400], SampleBounds::new(-32768, 32767));

    assert_eq!(q.hops, vec![6, 0]);
    assert_eq!(q.reconstructed, vec![0, -3200]);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_invalid_config_rejected() {
    let mut config = LheConfig::basic();
    config.num_levels = 8;
    assert!(matches!(Quantizer::new(config.clone()), Err(LheError::Config(_))));
    assert!(matches!(Reconstructor::new(config), Err(LheError::Config(_))));
}

#[test]
fn test_hop_count_mismatch() {
    let reconstructor = Reconstructor::new(LheConfig::basic()).unwrap();
    let result = reconstructor.reconstruct(&[4, 4, 4], 0, 4, SampleBounds::new(-10, 10));
    assert!(matches!(result, Err(LheError::ContainerFormat(_))));
}

#[test]
fn test_hop_level_out_of_alphabet() {
    let reconstructor = Reconstructor::new(LheConfig::basic()).unwrap();
    let result = reconstructor.reconstruct(&[4, 9], 0, 2, SampleBounds::new(-10, 10));
    assert!(matches!(result, Err(LheError::ContainerFormat(_))));
}
