//! Fidelity diagnostics for lhe codec

use serde::{Deserialize, Serialize};

use super::audio_constants::FULL_SCALE_AMPLITUDE;

/// Peak signal-to-noise ratio of a reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Psnr {
    /// Reconstruction is identical to the original (mean squared error is zero)
    Perfect,
    /// PSNR in decibels
    Decibels(f64),
}

impl Psnr {
    /// decibel value, `f64::INFINITY` for a perfect reconstruction
    pub fn as_db(self) -> f64 {
        match self {
            Psnr::Perfect => f64::INFINITY,
            Psnr::Decibels(db) => db,
        }
    }

    pub fn is_perfect(self) -> bool {
        self == Psnr::Perfect
    }
}

impl std::fmt::Display for Psnr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Psnr::Perfect => write!(f, "perfect"),
            Psnr::Decibels(db) => write!(f, "{:.2} dB", db),
        }
    }
}

/// Compute PSNR between a reconstruction and its original
///
/// # Arguments
/// * `reconstructed` - Decoded samples
/// * `original` - Source samples
/// * `sample_count` - Number of samples the mean is taken over
///
/// # Returns
/// `10 * log10(65535^2 / mse)`, or `Psnr::Perfect` when the mse is zero
pub fn compute_psnr(reconstructed: &[i16], original: &[i16], sample_count: usize) -> Psnr {
    let total: f64 = reconstructed
        .iter()
        .zip(original.iter())
        .take(sample_count)
        .map(|(&r, &o)| {
            let diff = r as f64 - o as f64;
            diff * diff
        })
        .sum();

    if total == 0.0 || sample_count == 0 {
        return Psnr::Perfect;
    }

    let mse = total / sample_count as f64;
    Psnr::Decibels(10.0 * (FULL_SCALE_AMPLITUDE * FULL_SCALE_AMPLITUDE / mse).log10())
}

/// Signed and absolute reconstruction error
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    /// mean of (original - reconstructed); non-zero means the quantizer drifts
    pub bias: f64,
    /// mean of |original - reconstructed|
    pub mean_abs: f64,
}

impl ErrorStats {
    pub fn compute(reconstructed: &[i16], original: &[i16]) -> Self {
        let n = reconstructed.len().min(original.len());
        if n == 0 {
            return ErrorStats::default();
        }

        let (sum, sum_abs) = reconstructed
            .iter()
            .zip(original.iter())
            .fold((0i64, 0i64), |(s, a), (&r, &o)| {
                let e = o as i64 - r as i64;
                (s + e, a + e.abs())
            });

        ErrorStats {
            bias: sum as f64 / n as f64,
            mean_abs: sum_abs as f64 / n as f64,
        }
    }
}
