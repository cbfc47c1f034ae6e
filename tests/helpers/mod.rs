//! Test helpers and fixtures for podium integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Geometry and gains
//! - `DSP_EPSILON` (1e-4): Filters and convolution
//! - `PERCEPTUAL_EPSILON` (0.001): Perceptual equivalence (-60dB)
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use podium::prelude::*;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: u32 = 48000;

/// Route engine logs to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine with a single gate thread and default stage.
pub fn test_engine() -> PodiumEngine {
    init_tracing();
    PodiumEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .gate_threads(1)
        .build()
        .expect("Failed to create test engine")
}

/// Spaced pair, 2 m apart, 1 m in front of the stage, omni capsules.
pub fn reference_spaced_pair() -> MicrophoneConfiguration {
    MicrophoneConfiguration::create(
        TechniqueId::SpacedPair,
        &ConfigOverrides::default()
            .spacing(2.0)
            .mic_y(-1.0)
            .pattern(PolarPattern::Omni),
    )
}

pub fn mono(samples: Vec<f32>) -> AudioBuffer {
    AudioBuffer::from_mono(samples, TEST_SAMPLE_RATE).expect("valid buffer")
}

/// Sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / TEST_SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Reproducible noise in -amplitude..amplitude.
pub fn generate_noise(num_samples: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            (((rng >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0) * amplitude
        })
        .collect()
}

/// Single sample at 1.0, rest zeros.
pub fn generate_impulse(num_samples: usize, position: usize) -> Vec<f32> {
    let mut samples = vec![0.0; num_samples];
    if position < num_samples {
        samples[position] = 1.0;
    }
    samples
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Index of the first sample above `threshold`.
pub fn onset(samples: &[f32], threshold: f32) -> Option<usize> {
    samples.iter().position(|s| s.abs() > threshold)
}

pub fn assert_is_silent(samples: &[f32], threshold: f32, context: &str) {
    let max_val = peak(samples);
    assert!(
        max_val <= threshold,
        "{}: Expected silence (threshold {}), but peak was {}",
        context,
        threshold,
        max_val
    );
}

pub fn assert_not_silent(samples: &[f32], min_peak: f32, context: &str) {
    let max_val = peak(samples);
    assert!(
        max_val >= min_peak,
        "{}: Expected audio (min_peak {}), but peak was only {}",
        context,
        min_peak,
        max_val
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine() {
        let samples = generate_sine(440.0, 1.0, 48000);
        assert!((rms(&samples) - 0.707).abs() < 0.01);
        assert!(peak(&samples) <= 1.0);
    }

    #[test]
    fn test_noise_is_bounded_and_reproducible() {
        let a = generate_noise(1000, 0.5, 7);
        assert_eq!(a, generate_noise(1000, 0.5, 7));
        assert!(peak(&a) <= 0.5);
    }
}
